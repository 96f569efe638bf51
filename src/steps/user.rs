//! User and session bindings.

use super::{StepArgs, StepFuture, StepRegistry};
use crate::error::HarnessError;
use crate::expect::expect_str_field;
use crate::petstore::User;
use crate::session::World;

pub(super) fn register(registry: &mut StepRegistry) -> Result<(), HarnessError> {
    registry
        .register(
            "I have a user with username {string} and email {string}",
            have_user,
        )?
        .register("I create the user", create_user)?
        .register("I get the user by username", get_user_by_username)?
        .register("I update the user email to {string}", update_user_email)?
        .register("I delete the user", delete_user)?
        .register(
            "I login with username {string} and password {string}",
            login,
        )?
        .register("I logout", logout)?
        .register("the response should contain username {string}", username_should_be)?
        .register("the response should contain email {string}", email_should_be)?;
    Ok(())
}

fn have_user(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let username = args.text(0)?.to_owned();
        world.set_user_draft(User {
            id: None,
            username: username.clone(),
            first_name: Some("Test".to_owned()),
            last_name: Some("User".to_owned()),
            email: Some(args.text(1)?.to_owned()),
            password: Some("password123".to_owned()),
            phone: Some("1234567890".to_owned()),
            user_status: Some(1),
        });
        world.track_user(username);
        Ok(())
    })
}

fn create_user(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let user = world.user_draft()?.clone();
        let response = world.users()?.create(&user).await?;
        world.capture("I create the user", response).await?;
        Ok(())
    })
}

fn get_user_by_username(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let username = world.username()?.to_owned();
        let response = world.users()?.get_by_username(&username).await?;
        world.capture("I get the user by username", response).await?;
        Ok(())
    })
}

fn update_user_email(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let username = world.username()?.to_owned();
        let draft = world.user_draft_mut()?;
        draft.email = Some(args.text(0)?.to_owned());
        let user = draft.clone();
        let response = world.users()?.update(&username, &user).await?;
        world.capture("I update the user email", response).await?;
        Ok(())
    })
}

fn delete_user(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let username = world.username()?.to_owned();
        let response = world.users()?.delete(&username).await?;
        world.capture("I delete the user", response).await?;
        Ok(())
    })
}

fn login(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let response = world
            .users()?
            .login(args.text(0)?, args.text(1)?)
            .await?;
        world.capture("I login", response).await?;
        Ok(())
    })
}

fn logout(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let response = world.users()?.logout().await?;
        world.capture("I logout", response).await?;
        Ok(())
    })
}

fn username_should_be(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { expect_str_field(world.last_json()?, "username", args.text(0)?) })
}

fn email_should_be(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { expect_str_field(world.last_json()?, "email", args.text(0)?) })
}
