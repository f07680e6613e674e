//! The Story Spoiler CRUD scenario
//!
//! Seven steps, in order: create, edit, list and delete a story, then check
//! that invalid input and unknown identifiers are rejected.

use crate::common::{Error, Result};
use crate::http::{ApiRequest, ApiResponse, StatusCode};
use crate::inspect::{array_len, extract_string_field, message_or_body, normalize};

use super::scenario::{ScenarioContext, Step, StoryEnvelope, StoryPayload};

/// Identifier that never names an existing story
pub const MISSING_STORY_ID: &str = "00000000-0000-0000-0000-000000000000";

const CREATE_PATH: &str = "Story/Create";
const LIST_PATH: &str = "Story/All";

fn edit_path(id: &str) -> String {
    format!("Story/Edit/{}", id)
}

fn delete_path(id: &str) -> String {
    format!("Story/Delete/{}", id)
}

fn edited_payload() -> StoryPayload {
    StoryPayload::new("Edited Title", "Edited Description")
}

/// All steps of the CRUD scenario in execution order
pub fn story_crud_steps() -> Vec<Step> {
    vec![
        Step {
            name: "create_story",
            description: "create a story; expect 201, an id and \"Successfully created!\"",
            build: build_create,
            verify: verify_create,
        },
        Step {
            name: "edit_story",
            description: "edit the created story; expect 200 and \"Successfully edited\"",
            build: build_edit,
            verify: verify_edit,
        },
        Step {
            name: "list_stories",
            description: "list all stories; expect 200 and a non-empty array",
            build: build_list,
            verify: verify_list,
        },
        Step {
            name: "delete_story",
            description: "delete the created story; expect 200 and \"Deleted successfully!\"",
            build: build_delete,
            verify: verify_delete,
        },
        Step {
            name: "create_invalid_story",
            description: "create with blank title and description; expect 400",
            build: build_create_invalid,
            verify: verify_create_invalid,
        },
        Step {
            name: "edit_missing_story",
            description: "edit an unknown id; expect 404 and \"No spoilers\"",
            build: build_edit_missing,
            verify: verify_edit_missing,
        },
        Step {
            name: "delete_missing_story",
            description: "delete an unknown id; expect 400 and \"Unable to delete this story spoiler!\"",
            build: build_delete_missing,
            verify: verify_delete_missing,
        },
    ]
}

// === Request builders ===

fn build_create(ctx: &ScenarioContext) -> Result<ApiRequest> {
    let payload = StoryPayload::new(ctx.created_title(), "Auto-created during exam tests");
    ApiRequest::post(CREATE_PATH).json(&payload)
}

fn build_edit(ctx: &ScenarioContext) -> Result<ApiRequest> {
    let id = ctx.require_story_id()?;
    ApiRequest::put(edit_path(id)).json(&edited_payload())
}

fn build_list(_ctx: &ScenarioContext) -> Result<ApiRequest> {
    Ok(ApiRequest::get(LIST_PATH))
}

fn build_delete(ctx: &ScenarioContext) -> Result<ApiRequest> {
    let id = ctx.require_story_id()?;
    Ok(ApiRequest::delete(delete_path(id)))
}

fn build_create_invalid(_ctx: &ScenarioContext) -> Result<ApiRequest> {
    ApiRequest::post(CREATE_PATH).json(&StoryPayload::blank())
}

fn build_edit_missing(_ctx: &ScenarioContext) -> Result<ApiRequest> {
    ApiRequest::put(edit_path(MISSING_STORY_ID)).json(&edited_payload())
}

fn build_delete_missing(_ctx: &ScenarioContext) -> Result<ApiRequest> {
    Ok(ApiRequest::delete(delete_path(MISSING_STORY_ID)))
}

// === Verifiers ===

fn verify_create(response: &ApiResponse, ctx: &mut ScenarioContext) -> Result<()> {
    expect_status(response, StatusCode::CREATED)?;

    let envelope = StoryEnvelope::parse(&response.body).unwrap_or_default();

    // The structured field and the raw lookups are both kept; neither is
    // known to be the one the service always fills.
    let story_id = envelope
        .story_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .or_else(|| non_blank_field(&response.body, "storyId"))
        .or_else(|| non_blank_field(&response.body, "id"))
        .ok_or_else(|| {
            Error::TestAssertion(format!(
                "StoryId was not returned in the response. Body: {}",
                response.body
            ))
        })?;

    let msg = normalize(envelope.msg.as_deref().unwrap_or(""));
    expect_message_eq(&msg, "Successfully created!", response)?;

    ctx.publish_story_id(story_id);
    Ok(())
}

fn verify_edit(response: &ApiResponse, _ctx: &mut ScenarioContext) -> Result<()> {
    expect_status(response, StatusCode::OK)?;

    let envelope = StoryEnvelope::parse(&response.body).unwrap_or_default();
    let msg = normalize(envelope.msg.as_deref().unwrap_or(""));
    expect_message_eq(&msg, "Successfully edited", response)
}

fn verify_list(response: &ApiResponse, _ctx: &mut ScenarioContext) -> Result<()> {
    expect_status(response, StatusCode::OK)?;

    match array_len(&response.body) {
        None => Err(Error::TestAssertion(format!(
            "Response is not an array. Body: {}",
            response.body
        ))),
        Some(0) => Err(Error::TestAssertion("Array is empty.".to_string())),
        Some(_) => Ok(()),
    }
}

fn verify_delete(response: &ApiResponse, _ctx: &mut ScenarioContext) -> Result<()> {
    expect_status(response, StatusCode::OK)?;
    expect_message_eq(
        &message_or_body(&response.body),
        "Deleted successfully!",
        response,
    )
}

fn verify_create_invalid(response: &ApiResponse, _ctx: &mut ScenarioContext) -> Result<()> {
    expect_status(response, StatusCode::BAD_REQUEST)
}

fn verify_edit_missing(response: &ApiResponse, _ctx: &mut ScenarioContext) -> Result<()> {
    expect_status(response, StatusCode::NOT_FOUND)?;
    expect_message_contains(&message_or_body(&response.body), "No spoilers", response)
}

fn verify_delete_missing(response: &ApiResponse, _ctx: &mut ScenarioContext) -> Result<()> {
    expect_status(response, StatusCode::BAD_REQUEST)?;
    expect_message_contains(
        &message_or_body(&response.body),
        "Unable to delete this story spoiler!",
        response,
    )
}

// === Assertion helpers ===

fn non_blank_field(body: &str, key: &str) -> Option<String> {
    extract_string_field(body, key)
        .found()
        .filter(|v| !v.trim().is_empty())
}

fn expect_status(response: &ApiResponse, expected: StatusCode) -> Result<()> {
    if response.status != expected {
        return Err(Error::TestAssertion(format!(
            "Expected {}, got {}",
            expected,
            response.describe()
        )));
    }
    Ok(())
}

fn expect_message_eq(actual: &str, expected: &str, response: &ApiResponse) -> Result<()> {
    if actual != expected {
        return Err(Error::TestAssertion(format!(
            "Expected message '{}', got '{}'. Status: {}",
            expected,
            actual,
            response.describe()
        )));
    }
    Ok(())
}

fn expect_message_contains(actual: &str, expected: &str, response: &ApiResponse) -> Result<()> {
    if !actual.contains(expected) {
        return Err(Error::TestAssertion(format!(
            "Expected message containing '{}', got '{}'. Status: {}",
            expected,
            actual,
            response.describe()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;

    fn response(status: StatusCode, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            body: body.to_string(),
        }
    }

    fn ctx_with_id(id: &str) -> ScenarioContext {
        let mut ctx = ScenarioContext::new();
        ctx.publish_story_id(id.to_string());
        ctx
    }

    #[test]
    fn test_steps_are_ordered_and_unique() {
        let names: Vec<&str> = story_crud_steps().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            [
                "create_story",
                "edit_story",
                "list_stories",
                "delete_story",
                "create_invalid_story",
                "edit_missing_story",
                "delete_missing_story",
            ]
        );
    }

    #[test]
    fn test_create_request() {
        let ctx = ScenarioContext::new();
        let req = build_create(&ctx).unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "Story/Create");
        let body = req.body.unwrap();
        assert_eq!(body["title"], ctx.created_title().as_str());
        assert_eq!(body["description"], "Auto-created during exam tests");
        assert_eq!(body["url"], "");
    }

    #[test]
    fn test_create_publishes_structured_id() {
        let mut ctx = ScenarioContext::new();
        let resp = response(
            StatusCode::CREATED,
            r#"{"storyId":"7d5e","msg":"Successfully created!"}"#,
        );
        verify_create(&resp, &mut ctx).unwrap();
        assert_eq!(ctx.story_id(), Some("7d5e"));
    }

    #[test]
    fn test_create_falls_back_to_raw_id() {
        let mut ctx = ScenarioContext::new();
        let resp = response(
            StatusCode::CREATED,
            r#"{"id":"raw-id","msg":" \"Successfully created!\" "}"#,
        );
        verify_create(&resp, &mut ctx).unwrap();
        assert_eq!(ctx.story_id(), Some("raw-id"));
    }

    #[test]
    fn test_create_without_id_fails_and_publishes_nothing() {
        let mut ctx = ScenarioContext::new();
        let resp = response(StatusCode::CREATED, r#"{"msg":"Successfully created!"}"#);
        let err = verify_create(&resp, &mut ctx).unwrap_err();
        assert!(err.to_string().contains("StoryId was not returned"));
        assert!(ctx.story_id().is_none());
    }

    #[test]
    fn test_create_wrong_status_embeds_body() {
        let mut ctx = ScenarioContext::new();
        let resp = response(StatusCode::BAD_REQUEST, r#"{"errors":["title"]}"#);
        let err = verify_create(&resp, &mut ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Test assertion failed: Expected 201 Created, got 400 Bad Request. Body: {\"errors\":[\"title\"]}"
        );
    }

    #[test]
    fn test_edit_and_delete_use_published_id_verbatim() {
        let ctx = ctx_with_id("a1b2-c3");
        let edit = build_edit(&ctx).unwrap();
        assert_eq!(edit.method, Method::PUT);
        assert_eq!(edit.path, "Story/Edit/a1b2-c3");
        assert_eq!(
            edit.body.unwrap(),
            serde_json::json!({"title": "Edited Title", "description": "Edited Description", "url": ""})
        );

        let delete = build_delete(&ctx).unwrap();
        assert_eq!(delete.method, Method::DELETE);
        assert_eq!(delete.path, "Story/Delete/a1b2-c3");
        assert!(delete.body.is_none());
    }

    #[test]
    fn test_dependent_steps_fail_fast_without_id() {
        let ctx = ScenarioContext::new();
        for build in [build_edit as fn(&ScenarioContext) -> Result<ApiRequest>, build_delete] {
            let err = build(&ctx).unwrap_err();
            assert!(matches!(err, Error::Precondition(_)));
        }
    }

    #[test]
    fn test_edit_message() {
        let mut ctx = ctx_with_id("x");
        verify_edit(&response(StatusCode::OK, r#"{"msg":"Successfully edited"}"#), &mut ctx).unwrap();
        assert!(verify_edit(&response(StatusCode::OK, r#"{"msg":"Edited"}"#), &mut ctx).is_err());
    }

    #[test]
    fn test_list_requires_non_empty_array() {
        let mut ctx = ScenarioContext::new();
        verify_list(&response(StatusCode::OK, r#"[{"title":"a"}]"#), &mut ctx).unwrap();

        let err = verify_list(&response(StatusCode::OK, "[]"), &mut ctx).unwrap_err();
        assert!(err.to_string().contains("Array is empty."));

        let err = verify_list(&response(StatusCode::OK, "{}"), &mut ctx).unwrap_err();
        assert!(err.to_string().contains("Response is not an array."));
    }

    #[test]
    fn test_delete_accepts_bare_string_body() {
        let mut ctx = ctx_with_id("x");
        verify_delete(&response(StatusCode::OK, "\"Deleted successfully!\""), &mut ctx).unwrap();
        verify_delete(&response(StatusCode::OK, r#"{"msg":"Deleted successfully!"}"#), &mut ctx)
            .unwrap();
    }

    #[test]
    fn test_negative_cases() {
        let mut ctx = ScenarioContext::new();

        let req = build_create_invalid(&ctx).unwrap();
        assert_eq!(req.body.unwrap(), serde_json::json!({"title": "", "description": ""}));
        verify_create_invalid(&response(StatusCode::BAD_REQUEST, ""), &mut ctx).unwrap();

        let req = build_edit_missing(&ctx).unwrap();
        assert_eq!(req.path, "Story/Edit/00000000-0000-0000-0000-000000000000");
        verify_edit_missing(
            &response(StatusCode::NOT_FOUND, r#"{"msg":"No spoilers..."}"#),
            &mut ctx,
        )
        .unwrap();

        let req = build_delete_missing(&ctx).unwrap();
        assert_eq!(req.path, "Story/Delete/00000000-0000-0000-0000-000000000000");
        verify_delete_missing(
            &response(
                StatusCode::BAD_REQUEST,
                "\"Unable to delete this story spoiler!\"",
            ),
            &mut ctx,
        )
        .unwrap();

        let err = verify_delete_missing(&response(StatusCode::OK, ""), &mut ctx).unwrap_err();
        assert!(err.to_string().contains("Expected 400 Bad Request, got 200 OK"));
    }
}
