#[cfg(test)]
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::{
        catalog::{Association, EntityCatalog, EntityDescriptor, MemoryCatalog, PropertyDescriptor},
        mapping::{ComplexObjectModel, ObjectModel, Row},
    };

    pub fn catalog() -> MemoryCatalog {
        MemoryCatalog::new()
            .with_entity(
                EntityDescriptor::new("User", "users")
                    .with_key(&["id"])
                    .with_column("id")
                    .with_column("name")
                    .with_column("age")
                    .with_column("city_id")
                    .with_property(PropertyDescriptor::complex("city", "City", Association::new("city_id", "id")))
                    .with_property(PropertyDescriptor::collection("orders", "Order", Association::new("id", "user_id"))),
            )
            .with_entity(
                EntityDescriptor::new("City", "cities")
                    .with_key(&["id"])
                    .with_column("id")
                    .with_column("name")
                    .with_column("province_id")
                    .with_property(PropertyDescriptor::complex("province", "Province", Association::new("province_id", "id")))
                    .with_property(PropertyDescriptor::collection("residents", "User", Association::new("id", "city_id"))),
            )
            .with_entity(
                EntityDescriptor::new("Province", "provinces")
                    .with_key(&["id"])
                    .with_column("id")
                    .with_column("name"),
            )
            .with_entity(
                EntityDescriptor::new("Order", "orders")
                    .with_key(&["id"])
                    .with_column("id")
                    .with_column("user_id")
                    .with_column("amount")
                    .with_column("status")
                    .with_column("paid")
                    .with_property(PropertyDescriptor::complex("user", "User", Association::new("user_id", "id")))
                    .with_property(PropertyDescriptor::collection("items", "OrderItem", Association::new("id", "order_id"))),
            )
            .with_entity(
                EntityDescriptor::new("OrderItem", "order_items")
                    .with_key(&["id"])
                    .with_column("id")
                    .with_column("order_id")
                    .with_column("product_id")
                    .with_column("quantity")
                    .with_property(PropertyDescriptor::complex("product", "Product", Association::new("product_id", "id"))),
            )
            .with_entity(
                EntityDescriptor::new("Product", "products")
                    .with_key(&["id"])
                    .with_column("id")
                    .with_column("name")
                    .with_column("category")
                    .with_column("price"),
            )
    }

    fn entity_model(entity: &str, alias: &str) -> ComplexObjectModel {
        let catalog = catalog();
        let descriptor = catalog.entity(entity).unwrap_or_else(|| panic!("fixture entity {entity}"));
        ComplexObjectModel::for_entity(descriptor, alias)
    }

    pub fn order_model(alias: &str) -> ObjectModel {
        ObjectModel::Complex(entity_model("Order", alias))
    }

    /// User bound to `users` with its `city` navigation bound to `cities`.
    pub fn user_with_city_model() -> ObjectModel {
        let mut user = entity_model("User", "users");
        user.add_member("city", ObjectModel::Complex(entity_model("City", "cities")));
        ObjectModel::Complex(user)
    }

    /// Rows of `users LEFT JOIN orders`, columns `id, name, age, city_id`
    /// followed by `id, user_id, amount, status, paid` of the order.
    pub fn user_order_rows() -> Vec<Row> {
        let rows = json!([
            [1, "Alice Johnson", 29, 10, 100, 1, 25.5, "open",   false],
            [1, "Alice Johnson", 29, 10, 101, 1, 80.0, "closed", true ],
            [2, "Bruno Martins", 34, 20, null, null, null, null, null],
            [3, "Carla Sousa",   41, 10, 102, 3, 12.0, "open",   true ]
        ]);
        match rows {
            Value::Array(rows) => rows.into_iter()
                .map(|row| match row {
                    Value::Array(cells) => cells,
                    other => vec![other],
                })
                .collect(),
            other => vec![vec![other]],
        }
    }
}
