//! `#[derive(Entity)]` metadata and record values.

#![allow(dead_code)]

use sqlfold::prelude::*;
use sqlfold::EntityType;

#[derive(Debug, Clone, Entity)]
#[orm(table = "Users", alias = "u")]
struct User {
    #[orm(column = "Id")]
    id: i32,
    #[orm(column = "UserName")]
    name: String,
    #[orm(column = "Email")]
    email: Option<String>,
    #[orm(skip)]
    cached_rank: Vec<u32>,
}

#[derive(Debug, Clone, Entity)]
#[orm(table = "dbo.Roles")]
struct Role {
    id: i64,
    title: String,
}

#[derive(Entity)]
struct AuditMarker;

#[test]
fn metadata_from_attributes() {
    assert_eq!(User::NAME, "User");
    assert_eq!(User::TABLE, "Users");
    assert_eq!(User::ALIAS, "u");
    assert_eq!(User::COLUMNS, &["Id", "UserName", "Email"]);
    assert_eq!(User::COL_ID, "Id");
    assert_eq!(User::COL_NAME, "UserName");
}

#[test]
fn metadata_defaults_to_type_and_field_names() {
    assert_eq!(Role::TABLE, "dbo.Roles");
    assert_eq!(Role::ALIAS, "Role");
    assert_eq!(Role::COLUMNS, &["id", "title"]);
    assert_eq!(AuditMarker::TABLE, "AuditMarker");
    assert!(AuditMarker::COLUMNS.is_empty());
}

#[test]
fn record_values_follow_column_order() {
    let user = User {
        id: 3,
        name: "carol".into(),
        email: None,
        cached_rank: vec![1],
    };
    assert_eq!(
        user.values(),
        vec![Value::Int(3), Value::Text("carol".into()), Value::Null]
    );
}

#[test]
fn entity_type_and_field_helper() {
    let ty = EntityType::of::<User>();
    assert_eq!(ty.table(), "Users");
    assert_eq!(ty.default_alias(), "u");

    let f = User::field(User::COL_NAME);
    assert_eq!(f.entity, ty);
    assert_eq!(f.field, "UserName");
}

#[test]
fn unit_entity_cannot_be_inserted() {
    let err = InsertBuilder::new(&AuditMarker).unwrap_err();
    assert!(err.is_construction());
}
