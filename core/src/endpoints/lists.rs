//! List endpoints of API v2.

use serde_json::Value;

use super::segment;
use crate::request::Endpoint;

/// `GET /2/lists/:id/tweets`
pub fn list_tweets(list_id: &str) -> Endpoint {
    Endpoint::get(format!("/2/lists/{}/tweets", segment(list_id)))
}

/// `GET /2/lists/:id`
pub fn list(list_id: &str) -> Endpoint {
    Endpoint::get(format!("/2/lists/{}", segment(list_id)))
}

/// `GET /2/users/:id/owned_lists`
pub fn owned_lists(user_id: &str) -> Endpoint {
    Endpoint::get(format!("/2/users/{}/owned_lists", segment(user_id)))
}

/// `POST /2/users/:id/followed_lists` with a JSON body.
pub fn follow_list(user_id: &str, list_id: &str) -> Endpoint {
    Endpoint::post(format!("/2/users/{}/followed_lists", segment(user_id)))
        .json_body()
        .body("list_id", Value::from(list_id))
}

/// `DELETE /2/users/:id/followed_lists/:list_id`
pub fn unfollow_list(user_id: &str, list_id: &str) -> Endpoint {
    Endpoint::delete(format!(
        "/2/users/{}/followed_lists/{}",
        segment(user_id),
        segment(list_id)
    ))
}

/// `GET /2/lists/:id/followers`
pub fn list_followers(list_id: &str) -> Endpoint {
    Endpoint::get(format!("/2/lists/{}/followers", segment(list_id)))
}

/// `GET /2/users/:id/followed_lists`
pub fn followed_lists(user_id: &str) -> Endpoint {
    Endpoint::get(format!("/2/users/{}/followed_lists", segment(user_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::request::{ApiRequest, BodyContentType};
    use serde_json::json;

    #[test]
    fn list_tweets_path_and_options() {
        let ep = list_tweets("84839422")
            .param("max_results", 100)
            .param("tweet.fields", json!(["created_at", "author_id"]));
        assert_eq!(ep.method(), HttpMethod::Get);
        assert_eq!(ep.path(), "/2/lists/84839422/tweets");
        assert_eq!(ep.query_parameters().len(), 2);
    }

    #[test]
    fn follow_list_uses_json_body() {
        let ep = follow_list("2244994945", "1228393702244134912");
        assert_eq!(ep.method(), HttpMethod::Post);
        assert_eq!(ep.path(), "/2/users/2244994945/followed_lists");
        assert_eq!(ep.body_content_type(), BodyContentType::Json);
        assert_eq!(
            ep.body_parameters().get("list_id"),
            Some(&json!("1228393702244134912"))
        );
    }

    #[test]
    fn unfollow_list_has_both_ids_in_path() {
        let ep = unfollow_list("1", "2");
        assert_eq!(ep.method(), HttpMethod::Delete);
        assert_eq!(ep.path(), "/2/users/1/followed_lists/2");
        assert!(ep.body_parameters().is_empty());
    }

    #[test]
    fn ids_are_encoded_as_single_segments() {
        assert_eq!(list("a/b").path(), "/2/lists/a%2Fb");
    }

    #[test]
    fn remaining_paths() {
        assert_eq!(owned_lists("7").path(), "/2/users/7/owned_lists");
        assert_eq!(list_followers("9").path(), "/2/lists/9/followers");
        assert_eq!(followed_lists("7").path(), "/2/users/7/followed_lists");
    }
}
