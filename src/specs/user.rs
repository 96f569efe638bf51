//! User suite.

use super::SpecCase;
use crate::expect::{expect_field_present, expect_status, expect_str_field, expect_text_contains};
use crate::generate::{random_email, random_phone, unique_name};
use crate::petstore::User;
use crate::session::{StepError, World};
use crate::steps::StepFuture;

pub(super) const CASES: &[SpecCase] = &[
    SpecCase {
        suite: "user",
        name: "Create a new user",
        tags: &["smoke", "create"],
        run: create_user,
    },
    SpecCase {
        suite: "user",
        name: "Get user by username",
        tags: &["regression", "read"],
        run: get_user,
    },
    SpecCase {
        suite: "user",
        name: "Update user information",
        tags: &["regression", "update"],
        run: update_user,
    },
    SpecCase {
        suite: "user",
        name: "Delete a user",
        tags: &["smoke", "delete"],
        run: delete_user,
    },
    SpecCase {
        suite: "user",
        name: "User login",
        tags: &["regression", "login"],
        run: login,
    },
    SpecCase {
        suite: "user",
        name: "User logout",
        tags: &["regression", "logout"],
        run: logout,
    },
];

struct Profile<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email_prefix: &'a str,
    password: &'a str,
    status: i32,
}

impl Profile<'_> {
    fn user(&self, username: &str) -> User {
        User {
            id: None,
            username: username.to_owned(),
            first_name: Some(self.first_name.to_owned()),
            last_name: Some(self.last_name.to_owned()),
            email: Some(random_email(self.email_prefix)),
            password: Some(self.password.to_owned()),
            phone: Some(random_phone()),
            user_status: Some(self.status),
        }
    }
}

async fn arrange_user(world: &mut World, user: &User) -> Result<(), StepError> {
    let response = world.users()?.create(user).await?;
    expect_status(world.capture("Create User API Call", response).await?, 200)?;
    Ok(())
}

fn create_user(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let username = unique_name("user");
        let user = Profile {
            first_name: "John",
            last_name: "Doe",
            email_prefix: "john",
            password: "password123",
            status: 1,
        }
        .user(&username);
        arrange_user(world, &user).await?;
        world.track_user(username);
        expect_field_present(world.last_json()?, "message")?;
        Ok(())
    })
}

fn get_user(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let username = unique_name("user");
        let user = Profile {
            first_name: "Jane",
            last_name: "Smith",
            email_prefix: "jane",
            password: "password456",
            status: 1,
        }
        .user(&username);
        arrange_user(world, &user).await?;
        world.track_user(username.clone());

        let response = world.users()?.get_by_username(&username).await?;
        expect_status(world.capture("Get User by Username API Call", response).await?, 200)?;
        let body = world.last_json()?;
        expect_str_field(body, "username", &username)?;
        expect_str_field(body, "firstName", "Jane")?;
        expect_str_field(body, "lastName", "Smith")?;
        expect_str_field(body, "email", user.email.as_deref().unwrap_or_default())
    })
}

fn update_user(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let username = unique_name("user");
        let original = Profile {
            first_name: "Bob",
            last_name: "Johnson",
            email_prefix: "bob",
            password: "password789",
            status: 1,
        }
        .user(&username);
        arrange_user(world, &original).await?;
        world.track_user(username.clone());

        let updated = Profile {
            first_name: "Robert",
            last_name: "Johnson Jr",
            email_prefix: "robert",
            password: "newpassword123",
            status: 2,
        }
        .user(&username);
        let update = world.users()?.update(&username, &updated).await?;
        expect_status(world.capture("Update User API Call", update).await?, 200)?;

        let lookup = world.users()?.get_by_username(&username).await?;
        expect_status(world.capture("Get Updated User API Call", lookup).await?, 200)?;
        let body = world.last_json()?;
        expect_str_field(body, "firstName", "Robert")?;
        expect_str_field(body, "lastName", "Johnson Jr")
    })
}

fn delete_user(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let username = unique_name("tempuser");
        let user = Profile {
            first_name: "Temp",
            last_name: "User",
            email_prefix: "temp",
            password: "password123",
            status: 1,
        }
        .user(&username);
        arrange_user(world, &user).await?;

        let deleted = world.users()?.delete(&username).await?;
        expect_status(world.capture("Delete User API Call", deleted).await?, 200)?;

        let lookup = world.users()?.get_by_username(&username).await?;
        expect_status(world.capture("Get Deleted User API Call", lookup).await?, 404)
    })
}

fn login(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let username = unique_name("loginuser");
        let password = "loginpassword123";
        let user = Profile {
            first_name: "Login",
            last_name: "Test",
            email_prefix: "login",
            password,
            status: 1,
        }
        .user(&username);
        arrange_user(world, &user).await?;
        world.track_user(username.clone());

        let response = world.users()?.login(&username, password).await?;
        expect_status(world.capture("User Login API Call", response).await?, 200)?;
        let message = expect_field_present(world.last_json()?, "message")?;
        let text = message
            .as_str()
            .ok_or_else(|| StepError::assertion("field `message`", "a string", message))?;
        expect_text_contains("field `message`", text, "logged in user session")
    })
}

fn logout(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let response = world.users()?.logout().await?;
        expect_status(world.capture("User Logout API Call", response).await?, 200)?;
        expect_str_field(world.last_json()?, "message", "ok")
    })
}
