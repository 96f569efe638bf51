//! Pet suite.

use super::SpecCase;
use crate::expect::{
    expect_all_with_status, expect_array, expect_field, expect_i64_field, expect_status,
    expect_str_field,
};
use crate::generate::{unique_id, unique_name};
use crate::petstore::{Category, Pet, PetStatus, Tag};
use crate::session::{StepError, World};
use crate::steps::StepFuture;

pub(super) const CASES: &[SpecCase] = &[
    SpecCase {
        suite: "pet",
        name: "Create a new pet",
        tags: &["smoke", "create"],
        run: create_pet,
    },
    SpecCase {
        suite: "pet",
        name: "Get pet by ID",
        tags: &["regression", "read"],
        run: get_pet,
    },
    SpecCase {
        suite: "pet",
        name: "Update pet status",
        tags: &["regression", "update"],
        run: update_pet_status,
    },
    SpecCase {
        suite: "pet",
        name: "Search pets by status: available",
        tags: &["regression", "search"],
        run: search_available,
    },
    SpecCase {
        suite: "pet",
        name: "Search pets by status: pending",
        tags: &["regression", "search"],
        run: search_pending,
    },
    SpecCase {
        suite: "pet",
        name: "Search pets by status: sold",
        tags: &["regression", "search"],
        run: search_sold,
    },
    SpecCase {
        suite: "pet",
        name: "Delete a pet",
        tags: &["smoke", "delete"],
        run: delete_pet,
    },
];

/// Creates an available pet named after `prefix` and returns its id and name.
async fn arrange_pet(world: &mut World, prefix: &str, photo: &str) -> Result<(i64, String), StepError> {
    let name = unique_name(prefix);
    let pet = Pet::named(&name, PetStatus::Available)
        .with_photo_urls([photo])
        .with_id(unique_id());
    let response = world.pets()?.create(&pet).await?;
    expect_status(world.capture("Create Pet API Call", response).await?, 200)?;
    let id = expect_i64_field(world.last_json()?, "id")?;
    Ok((id, name))
}

fn create_pet(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let name = unique_name("Doggo");
        let pet = Pet {
            id: Some(unique_id()),
            category: Some(Category {
                id: Some(1),
                name: Some("Dogs".to_owned()),
            }),
            name: name.clone(),
            photo_urls: vec!["https://example.com/photo1.jpg".to_owned()],
            tags: Some(vec![Tag {
                id: Some(1),
                name: Some("friendly".to_owned()),
            }]),
            status: Some(PetStatus::Available),
        };
        let response = world.pets()?.create(&pet).await?;
        expect_status(world.capture("Create Pet API Call", response).await?, 200)?;
        let body = world.last_json()?;
        let id = expect_i64_field(body, "id")?;
        expect_str_field(body, "name", &name)?;
        expect_str_field(body, "status", "available")?;
        world.track_pet(id);
        Ok(())
    })
}

fn get_pet(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let (id, name) = arrange_pet(world, "Kitty", "https://example.com/cat.jpg").await?;
        world.track_pet(id);

        let response = world.pets()?.get_by_id(id).await?;
        expect_status(world.capture("Get Pet by ID API Call", response).await?, 200)?;
        let body = world.last_json()?;
        expect_field(body, "id", &id.into())?;
        expect_str_field(body, "name", &name)?;
        expect_str_field(body, "status", "available")
    })
}

fn update_pet_status(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let (id, _name) = arrange_pet(world, "Birdy", "https://example.com/bird.jpg").await?;
        world.track_pet(id);
        let mut pet: Pet = world.last_response()?.json()?;
        pet.status = Some(PetStatus::Sold);

        let response = world.pets()?.update(&pet).await?;
        expect_status(world.capture("Update Pet API Call", response).await?, 200)?;
        let body = world.last_json()?;
        expect_field(body, "id", &id.into())?;
        expect_str_field(body, "status", "sold")
    })
}

async fn search(world: &mut World, status: PetStatus) -> Result<(), StepError> {
    let response = world.pets()?.find_by_status(status).await?;
    expect_status(
        world
            .capture("Search Pets by Status API Call", response)
            .await?,
        200,
    )?;
    let items = expect_array(world.last_json()?)?;
    expect_all_with_status(items, status.as_str())
}

fn search_available(world: &mut World) -> StepFuture<'_> {
    Box::pin(search(world, PetStatus::Available))
}

fn search_pending(world: &mut World) -> StepFuture<'_> {
    Box::pin(search(world, PetStatus::Pending))
}

fn search_sold(world: &mut World) -> StepFuture<'_> {
    Box::pin(search(world, PetStatus::Sold))
}

fn delete_pet(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let (id, _name) = arrange_pet(world, "TempPet", "https://example.com/temp.jpg").await?;

        let deleted = world.pets()?.delete(id).await?;
        expect_status(world.capture("Delete Pet API Call", deleted).await?, 200)?;

        let lookup = world.pets()?.get_by_id(id).await?;
        expect_status(world.capture("Get Deleted Pet API Call", lookup).await?, 404)
    })
}
