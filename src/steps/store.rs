//! Store and order bindings.

use serde_json::Value;

use super::common::response_id;
use super::{StepArgs, StepFuture, StepRegistry};
use crate::error::HarnessError;
use crate::expect::{expect_field, expect_non_empty_object, expect_str_field};
use crate::generate::iso_now;
use crate::petstore::{Order, OrderStatus};
use crate::session::{StepError, World};

pub(super) fn register(registry: &mut StepRegistry) -> Result<(), HarnessError> {
    registry
        .register(
            "I have an order for pet id {int} with quantity {int}",
            have_order,
        )?
        .register("I place the order", place_order)?
        .register("I save the order id", save_order_id)?
        .register("I get the order by id", get_order_by_id)?
        .register("I delete the order", delete_order)?
        .register("I get the store inventory", get_inventory)?
        .register("the order status should be {string}", order_status_should_be)?
        .register("the order pet id should be {int}", order_pet_id_should_be)?
        .register("the response should contain inventory data", inventory_data)?;
    Ok(())
}

fn have_order(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let pet_id = args.int(0)?;
        let raw_quantity = args.int(1)?;
        let quantity = i32::try_from(raw_quantity).map_err(|_| {
            StepError::invalid_argument(format!("quantity {raw_quantity} is out of range"))
        })?;
        world.set_order_draft(Order {
            id: None,
            pet_id,
            quantity: Some(quantity),
            ship_date: Some(iso_now()),
            status: Some(OrderStatus::Placed),
            complete: Some(false),
        });
        Ok(())
    })
}

fn place_order(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let order = world.order_draft()?.clone();
        let response = world.store()?.place_order(&order).await?;
        world.capture("I place the order", response).await?;
        Ok(())
    })
}

fn save_order_id(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let id = response_id(world)?;
        tracing::debug!(order_id = id, "saved order id");
        world.track_order(id);
        Ok(())
    })
}

fn get_order_by_id(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let id = world.order_id()?;
        let response = world.store()?.get_order_by_id(id).await?;
        world.capture("I get the order by id", response).await?;
        Ok(())
    })
}

fn delete_order(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let id = world.order_id()?;
        let response = world.store()?.delete_order(id).await?;
        world.capture("I delete the order", response).await?;
        Ok(())
    })
}

fn get_inventory(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let response = world.store()?.inventory().await?;
        world.capture("I get the store inventory", response).await?;
        Ok(())
    })
}

fn order_status_should_be(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move { expect_str_field(world.last_json()?, "status", args.text(0)?) })
}

fn order_pet_id_should_be(world: &mut World, args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let expected = Value::from(args.int(0)?);
        expect_field(world.last_json()?, "petId", &expected)
    })
}

fn inventory_data(world: &mut World, _args: StepArgs) -> StepFuture<'_> {
    Box::pin(async move {
        let inventory = expect_non_empty_object(world.last_json()?)?;
        tracing::debug!(statuses = inventory.len(), "inventory data present");
        Ok(())
    })
}
