//! Statistics over an in-memory list of blog posts.
//!
//! Every function here is pure: the input slice is only read, an empty slice
//! yields `0` or `None`, and ties are broken by input order so results are
//! deterministic.

use std::collections::HashMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::domain::BlogPost;

/// The author with the most posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorBlogs {
    /// `None` groups posts without an author.
    pub author: Option<String>,
    pub count: usize,
}

/// The author whose posts have the most likes in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorLikes {
    pub author: Option<String>,
    pub likes: u64,
}

/// All statistics for one list of posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogStats<'a> {
    pub total_likes: u64,
    pub favorite_blog: Option<&'a BlogPost>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}

/// Sum of likes across all posts.
pub fn total_likes(posts: &[BlogPost]) -> u64 {
    posts.iter().map(|p| u64::from(p.likes)).sum()
}

/// The post with the most likes. The first one wins a tie.
pub fn favorite_blog(posts: &[BlogPost]) -> Option<&BlogPost> {
    let mut iter = posts.iter();
    let first = iter.next()?;
    Some(iter.fold(first, |best, p| if p.likes > best.likes { p } else { best }))
}

/// The author with the most posts.
pub fn most_blogs(posts: &[BlogPost]) -> Option<AuthorBlogs> {
    let (author, count) = max_by_author(posts, |_| 1usize)?;
    Some(AuthorBlogs {
        author: author.map(String::from),
        count,
    })
}

/// The author with the most likes summed over their posts.
pub fn most_likes(posts: &[BlogPost]) -> Option<AuthorLikes> {
    let (author, likes) = max_by_author(posts, |p| u64::from(p.likes))?;
    Some(AuthorLikes {
        author: author.map(String::from),
        likes,
    })
}

pub fn summarize(posts: &[BlogPost]) -> BlogStats<'_> {
    BlogStats {
        total_likes: total_likes(posts),
        favorite_blog: favorite_blog(posts),
        most_blogs: most_blogs(posts),
        most_likes: most_likes(posts),
    }
}

/// Sum `weight` per author and return the largest group.
///
/// Groups are kept in first-seen order and only a strictly larger total
/// replaces the current best, so the earliest author wins a tie.
fn max_by_author<W, F>(posts: &[BlogPost], weight: F) -> Option<(Option<&str>, W)>
where
    W: Copy + Ord + AddAssign,
    F: Fn(&BlogPost) -> W,
{
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();
    let mut groups: Vec<(Option<&str>, W)> = Vec::new();

    for post in posts {
        let key = post.author_key();
        let w = weight(post);
        match index.get(&key) {
            Some(&i) => groups[i].1 += w,
            None => {
                index.insert(key, groups.len());
                groups.push((key, w));
            }
        }
    }

    let mut iter = groups.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |best, g| if g.1 > best.1 { g } else { best }))
}
