//! Bindings shared by every resource.

use super::{StepArgs, StepFuture, StepRegistry};
use crate::error::HarnessError;
use crate::expect::{expect_field_present, expect_i64_field, expect_status, expect_str_field, expect_text_contains};
use crate::session::{StepError, World};

pub(super) fn register(registry: &mut StepRegistry) -> Result<(), HarnessError> {
    registry
        .register("the response status code should be {int}", status_code_should_be)?
        .register("the response message should be {string}", message_should_be)?
        .register("the response message should contain {string}", message_should_contain)?;
    Ok(())
}

fn status_code_should_be(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let expected = args.status(0)?;
        expect_status(world.last_response()?, expected)
    })
}

fn message_should_be(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { expect_str_field(world.last_json()?, "message", args.text(0)?) })
}

fn message_should_contain(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let message = expect_field_present(world.last_json()?, "message")?;
        let text = message
            .as_str()
            .ok_or_else(|| StepError::assertion("field `message`", "a string", message))?;
        expect_text_contains("field `message`", text, args.text(0)?)
    })
}

/// Numeric `id` of the last JSON body.
pub(super) fn response_id(world: &World) -> Result<i64, StepError> {
    expect_i64_field(world.last_json()?, "id")
}
