use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::seq::index;
use rand::Rng;

use crate::models::{comments::Comment, posts::Post, users::User};
use crate::store::Database;

pub const USER_COUNT: usize = 10;
pub const POSTS_PER_USER: usize = 10;
pub const COMMENTS_PER_POST: usize = 3;

pub const AVATAR_URL: &str = "https://i.pravatar.cc/300";

// Bookmarks are drawn from ids 1..=90; the pool is deliberately not tied to
// the generated post count.
const BOOKMARK_POOL: usize = 90;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Margaret", "Dennis", "Radia",
    "Niklaus", "Frances", "John", "Katherine", "Tim", "Hedy", "Linus",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth", "Hamilton", "Ritchie",
    "Perlman", "Wirth", "Allen", "Backus", "Johnson", "Lee", "Lamarr", "Torvalds",
];

const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed",
    "tempor", "incididunt", "labore", "dolore", "magna", "aliqua", "enim", "minim", "veniam",
    "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi", "aliquip", "commodo",
    "consequat", "duis", "aute", "irure", "voluptate", "velit", "esse", "cillum", "fugiat",
];

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

fn words<R: Rng>(rng: &mut R, count: usize) -> String {
    (0..count)
        .map(|_| pick(rng, LOREM))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn sentence<R: Rng>(rng: &mut R) -> String {
    let count = rng.gen_range(4..=9);
    let mut text = words(rng, count);
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    text.push('.');
    text
}

fn paragraph<R: Rng>(rng: &mut R) -> String {
    let count = rng.gen_range(3..=5);
    (0..count).map(|_| sentence(rng)).collect::<Vec<_>>().join(" ")
}

pub fn paragraphs<R: Rng>(rng: &mut R) -> String {
    let count = rng.gen_range(2..=3);
    (0..count).map(|_| paragraph(rng)).collect::<Vec<_>>().join("\n")
}

fn password<R: Rng>(rng: &mut R) -> String {
    rng.sample_iter(Alphanumeric).take(12).map(char::from).collect()
}

fn past_date<R: Rng>(rng: &mut R) -> DateTime<Utc> {
    Utc::now() - Duration::seconds(rng.gen_range(0..365 * 24 * 3600))
}

/// Random subset of ids 1..=pool, between min and max elements.
fn id_subset<R: Rng>(rng: &mut R, pool: usize, min: usize, max: usize) -> Vec<u64> {
    let count = rng.gen_range(min..=max);
    index::sample(rng, pool, count)
        .into_iter()
        .map(|i| (i + 1) as u64)
        .collect()
}

/// Build the full relational dataset: 10 users, 10 posts each, 3 comments
/// per post. Friend and bookmark lists are random subsets of the id ranges
/// the counts imply; they are not cross-checked any further.
pub fn generate<R: Rng>(rng: &mut R) -> Database {
    let total_posts = USER_COUNT * POSTS_PER_USER;

    let mut users = Vec::with_capacity(USER_COUNT);
    for i in 0..USER_COUNT {
        let id = (i + 1) as u64;
        let first = pick(rng, FIRST_NAMES);
        let last = pick(rng, LAST_NAMES);
        // The id suffix keeps usernames unique even when names collide.
        let username = format!("{}{}{}", first.to_lowercase(), last.to_lowercase(), id);
        let created_at = past_date(rng);
        users.push(User {
            id,
            full_name: format!("{first} {last}"),
            username: username.clone(),
            password: password(rng),
            email: format!("{username}@example.com"),
            about: paragraphs(rng),
            avatar: AVATAR_URL.to_string(),
            cover: Some(format!("https://picsum.photos/800/450?random={}", id + 1)),
            created_at,
            updated_at: created_at,
            friend_ids: id_subset(rng, USER_COUNT, 0, 5),
            bookmarked_posts: id_subset(rng, BOOKMARK_POOL, 0, 3),
        });
    }

    let mut posts = Vec::with_capacity(total_posts);
    let mut comments = Vec::with_capacity(total_posts * COMMENTS_PER_POST);
    let mut post_id = 0u64;
    let mut comment_id = 0u64;

    for user in &users {
        for _ in 0..POSTS_PER_USER {
            post_id += 1;
            let created_at = past_date(rng);
            posts.push(Post {
                id: post_id,
                user_id: user.id,
                title: sentence(rng),
                body: paragraphs(rng),
                image_url: format!("https://picsum.photos/800/450?random={}", post_id + 1),
                created_at,
                updated_at: created_at,
            });

            for _ in 0..COMMENTS_PER_POST {
                comment_id += 1;
                let created_at = past_date(rng);
                comments.push(Comment {
                    id: comment_id,
                    post_id,
                    user_id: users[rng.gen_range(0..users.len())].id,
                    body: sentence(rng),
                    created_at,
                    updated_at: created_at,
                });
            }
        }
    }

    Database {
        users,
        posts,
        comments,
    }
}
