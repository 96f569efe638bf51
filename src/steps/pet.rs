//! Pet bindings.

use serde_json::Value;

use super::common::response_id;
use super::{StepArgs, StepFuture, StepRegistry};
use crate::error::HarnessError;
use crate::expect::{
    expect_all_with_status, expect_array, expect_non_empty_array, expect_status, expect_str_field,
};
use crate::petstore::{Pet, PetStatus};
use crate::session::{StepError, World};

pub(super) fn register(registry: &mut StepRegistry) -> Result<(), HarnessError> {
    registry
        .register(
            "I have a pet with name {string} and status {string}",
            have_pet,
        )?
        .register("I create the pet", create_pet)?
        .register("I save the pet id", save_pet_id)?
        .register("I get the pet by id", get_pet_by_id)?
        .register("I update the pet status to {string}", update_pet_status)?
        .register("I search for pets with status {string}", search_pets)?
        .register("I delete the pet", delete_pet)?
        .register("the response should contain pet name {string}", pet_name_should_be)?
        .register("the pet status should be {string}", pet_status_should_be)?
        .register("the response should contain a list of pets", list_of_pets)?
        .register(
            "every returned pet should have status {string}",
            every_pet_has_status,
        )?;
    Ok(())
}

fn parse_status(raw: &str) -> Result<PetStatus, StepError> {
    raw.parse::<PetStatus>()
        .map_err(|error| StepError::invalid_argument(error.to_string()))
}

fn have_pet(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let status = parse_status(args.text(1)?)?;
        let pet = Pet::named(args.text(0)?, status).with_photo_urls(["string"]);
        world.set_pet_draft(pet);
        Ok(())
    })
}

fn create_pet(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let pet = world.pet_draft()?.clone();
        let response = world.pets()?.create(&pet).await?;
        world.capture("I create the pet", response).await?;
        Ok(())
    })
}

fn save_pet_id(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let id = response_id(world)?;
        tracing::debug!(pet_id = id, "saved pet id");
        world.track_pet(id);
        Ok(())
    })
}

fn get_pet_by_id(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let id = world.pet_id()?;
        let response = world.pets()?.get_by_id(id).await?;
        world.capture("I get the pet by id", response).await?;
        Ok(())
    })
}

fn update_pet_status(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let status = parse_status(args.text(0)?)?;
        let id = world.pet_id()?;
        let current = world.pets()?.get_by_id(id).await?;
        let fetched = world.capture("fetch current pet", current).await?;
        expect_status(fetched, 200)?;
        let mut pet: Value = fetched.json()?;
        pet.as_object_mut()
            .ok_or_else(|| StepError::assertion("fetched pet", "a JSON object", "another JSON value"))?
            .insert("status".to_owned(), Value::from(status.as_str()));
        let response = world.pets()?.update_raw(&pet).await?;
        world
            .capture("I update the pet status", response)
            .await?;
        Ok(())
    })
}

fn search_pets(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let status = args.text(0)?.to_owned();
        let response = world.pets()?.find_by_status_raw(&status).await?;
        world
            .capture("I search for pets by status", response)
            .await?;
        Ok(())
    })
}

fn delete_pet(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let id = world.pet_id()?;
        let response = world.pets()?.delete(id).await?;
        world.capture("I delete the pet", response).await?;
        Ok(())
    })
}

fn pet_name_should_be(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { expect_str_field(world.last_json()?, "name", args.text(0)?) })
}

fn pet_status_should_be(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { expect_str_field(world.last_json()?, "status", args.text(0)?) })
}

fn list_of_pets(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let pets = expect_non_empty_array(world.last_json()?)?;
        tracing::debug!(count = pets.len(), "found pets");
        Ok(())
    })
}

fn every_pet_has_status(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let pets = expect_array(world.last_json()?)?;
        expect_all_with_status(pets, args.text(0)?)
    })
}
