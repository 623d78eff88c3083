//! End-to-end statement assembly with derived entities.

#![allow(dead_code)]

use sqlfold::prelude::*;
use sqlfold::{QbError, StatementKind};

#[derive(Debug, Clone, Entity)]
#[orm(table = "Users")]
struct User {
    #[orm(column = "Id")]
    id: i32,
    #[orm(column = "Name")]
    name: String,
    #[orm(column = "RoleId")]
    role_id: i32,
}

#[derive(Debug, Clone, Entity)]
#[orm(table = "Roles", alias = "r")]
struct Role {
    #[orm(column = "Id")]
    id: i32,
    #[orm(column = "Name")]
    name: String,
}

#[derive(Debug, Clone, Entity)]
#[orm(table = "Articles", alias = "a")]
struct Article {
    #[orm(column = "Id")]
    id: i64,
    #[orm(column = "Title")]
    title: String,
    #[orm(column = "Body")]
    body: String,
}

fn user(id: i32, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        role_id: 1,
    }
}

#[test]
fn users_page_with_role_join() -> QbResult<()> {
    let mut qb = QueryBuilder::new();
    qb.from_as::<User>("u")?
        .inner_join::<Role>(&field::<Role>("Id").eq(field::<User>("RoleId")))?
        .project(
            &ProjectionSpec::new()
                .map(field::<User>("Id"), "UserId")
                .map(field::<Role>("Name"), "RoleName"),
        )?
        .where_expr(&field::<User>("Id").gt(10))?
        .like(&field::<User>("Name"), "ali*", true)?
        .order_by_desc(field::<User>("Id"))?
        .paginate(2, 20)?;

    let page = qb.build()?;
    assert_eq!(
        page.sql(),
        "SELECT u.Id AS UserId, r.Name AS RoleName FROM Users u \
         INNER JOIN Roles r ON r.Id = u.RoleId \
         WHERE u.Id > @p1 AND LOWER(u.Name) LIKE LOWER(@p2) \
         ORDER BY u.Id DESC OFFSET @offset ROWS FETCH NEXT @fetch ROWS ONLY"
    );
    assert_eq!(page.param("offset"), Some(&Value::BigInt(20)));
    assert_eq!(page.param("fetch"), Some(&Value::BigInt(20)));
    assert_eq!(page.param("p2"), Some(&Value::Text("ali%".into())));

    let total = qb.count()?;
    assert_eq!(
        total.sql(),
        "SELECT COUNT(1) AS Total FROM Users u \
         INNER JOIN Roles r ON r.Id = u.RoleId \
         WHERE u.Id > @p1 AND LOWER(u.Name) LIKE LOWER(@p2)"
    );
    Ok(())
}

#[test]
fn generated_field_helper_and_default_alias() -> QbResult<()> {
    let mut qb = QueryBuilder::new();
    qb.from::<Role>()?
        .where_expr(&Role::field(Role::COL_NAME).eq("admin"))?;
    assert_eq!(
        qb.build()?.sql(),
        "SELECT * FROM Roles r WHERE r.Name = @p1"
    );
    Ok(())
}

#[test]
fn table_map_supplies_aliases() -> QbResult<()> {
    let map = TableMap::new().alias::<User>("usr").alias::<Role>("rl");
    let mut qb = QueryBuilder::new().with_table_map(map);
    qb.from::<User>()?
        .left_join::<Role>(&field::<Role>("Id").eq(field::<User>("RoleId")))?;
    assert_eq!(
        qb.build()?.sql(),
        "SELECT * FROM Users usr LEFT JOIN Roles rl ON rl.Id = usr.RoleId"
    );
    Ok(())
}

#[test]
fn full_text_over_several_columns() -> QbResult<()> {
    let mut qb = QueryBuilder::new();
    qb.from::<Article>()?.full_text(
        &[field::<Article>("Title"), field::<Article>("Body")],
        "\"rust*\"",
        FullTextMode::Contains,
    )?;
    let t = qb.build()?;
    assert_eq!(
        t.sql(),
        "SELECT * FROM Articles a WHERE CONTAINS((a.Title, a.Body), @p1)"
    );
    assert_eq!(t.param("p1"), Some(&Value::Text("\"rust*\"".into())));
    Ok(())
}

#[test]
fn unregistered_join_target_is_reported() {
    let mut qb = QueryBuilder::new();
    qb.from::<User>().unwrap();
    let err = qb
        .where_expr(&field::<Article>("Id").eq(1i64))
        .unwrap_err();
    assert!(matches!(err, QbError::AliasNotFound { ref entity } if entity == "Article"));
}

#[test]
fn batch_insert_and_update() -> QbResult<()> {
    let rows = [user(1, "a"), user(2, "b")];
    let insert = InsertBuilder::batch(&rows)?.build_insert()?;
    assert_eq!(insert.params().len(), 6);
    assert_eq!(
        insert.sql(),
        "INSERT INTO Users (Id, Name, RoleId) VALUES (@p1, @p2, @p3), (@p4, @p5, @p6)"
    );

    let guarded = InsertBuilder::new(&rows[0])?.find_one_insert("Name = @name", [("name", "a")])?;
    assert_eq!(guarded.kind(), StatementKind::InsertIfNotExists);
    assert!(guarded.sql().starts_with("IF NOT EXISTS (SELECT 1 FROM Users WHERE Name = @name)"));

    let update = UpdateBuilder::new(&rows[1])?.build_update()?;
    assert_eq!(
        update.sql(),
        "UPDATE Users SET Name = @p1, RoleId = @p2 WHERE Id = @key"
    );
    assert_eq!(update.param("key"), Some(&Value::Int(2)));
    Ok(())
}

#[test]
fn template_serializes_to_json() -> QbResult<()> {
    let mut qb = QueryBuilder::new();
    qb.from_as::<User>("u")?
        .in_list(&field::<User>("Id"), [1, 2])?;
    let json = serde_json::to_value(qb.build()?).unwrap();
    assert_eq!(json["sql"], "SELECT * FROM Users u WHERE u.Id IN (@p1, @p2)");
    assert_eq!(json["params"]["p2"], 2);
    assert_eq!(json["kind"], "select");
    Ok(())
}
