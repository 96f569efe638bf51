//! Store suite.

use serde_json::Value;

use super::SpecCase;
use crate::expect::{
    expect_field, expect_i64_field, expect_non_empty_object, expect_status, expect_str_field,
};
use crate::generate::{iso_now, order_id, unique_id};
use crate::petstore::{Order, OrderStatus};
use crate::session::{StepError, World};
use crate::steps::StepFuture;

pub(super) const CASES: &[SpecCase] = &[
    SpecCase {
        suite: "store",
        name: "Place a new order",
        tags: &["smoke", "order"],
        run: place_order,
    },
    SpecCase {
        suite: "store",
        name: "Get order by ID",
        tags: &["regression", "read"],
        run: get_order,
    },
    SpecCase {
        suite: "store",
        name: "Delete an order",
        tags: &["regression", "delete"],
        run: delete_order,
    },
    SpecCase {
        suite: "store",
        name: "Get store inventory",
        tags: &["smoke", "inventory"],
        run: inventory,
    },
];

fn new_order(pet_id: i64, quantity: i32) -> Order {
    Order {
        id: Some(order_id()),
        pet_id,
        quantity: Some(quantity),
        ship_date: Some(iso_now()),
        status: Some(OrderStatus::Placed),
        complete: Some(false),
    }
}

/// Places an order for a fresh pet id and returns `(order id, pet id)`.
async fn arrange_order(world: &mut World, quantity: i32) -> Result<(i64, i64), StepError> {
    let pet_id = unique_id();
    let order = new_order(pet_id, quantity);
    let response = world.store()?.place_order(&order).await?;
    expect_status(world.capture("Place Order API Call", response).await?, 200)?;
    let id = expect_i64_field(world.last_json()?, "id")?;
    Ok((id, pet_id))
}

fn place_order(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let (id, pet_id) = arrange_order(world, 1).await?;
        world.track_order(id);

        let body = world.last_json()?;
        expect_field(body, "petId", &pet_id.into())?;
        expect_str_field(body, "status", "placed")?;
        expect_field(body, "complete", &Value::Bool(false))
    })
}

fn get_order(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let (id, pet_id) = arrange_order(world, 2).await?;
        world.track_order(id);

        let response = world.store()?.get_order_by_id(id).await?;
        expect_status(world.capture("Get Order by ID API Call", response).await?, 200)?;
        let body = world.last_json()?;
        expect_field(body, "id", &id.into())?;
        expect_field(body, "petId", &pet_id.into())?;
        expect_str_field(body, "status", "placed")
    })
}

fn delete_order(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let (id, _pet_id) = arrange_order(world, 1).await?;

        let deleted = world.store()?.delete_order(id).await?;
        expect_status(world.capture("Delete Order API Call", deleted).await?, 200)?;

        let lookup = world.store()?.get_order_by_id(id).await?;
        expect_status(world.capture("Get Deleted Order API Call", lookup).await?, 404)
    })
}

fn inventory(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let response = world.store()?.inventory().await?;
        expect_status(world.capture("Get Store Inventory API Call", response).await?, 200)?;
        expect_non_empty_object(world.last_json()?)?;
        Ok(())
    })
}
