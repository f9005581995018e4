use serde::{Deserialize, Serialize};

/// A post from the placeholder API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u32,
    pub title: String,
    pub body: String,
    pub user_id: u32,
}

/// A user from the placeholder API. Only the rendered fields are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub website: String,
}

/// Data rendered by the home page.
#[derive(Debug, Clone, Default)]
pub struct HomeData {
    pub posts: Vec<Post>,
    pub users: Vec<User>,
}
