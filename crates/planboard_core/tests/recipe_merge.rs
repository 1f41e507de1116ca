use planboard_core::db::open_db_in_memory;
use planboard_core::model::recipe::parse_ingredient_block;
use planboard_core::{
    DeleteOutcome, ErrorKind, IngredientMergeService, NewRecipePhoto, RecipeDraft, RecipeService,
    ServiceError, SqliteListRepository, SqliteRecipeRepository, TaskListService, ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn recipes(conn: &Connection) -> RecipeService<SqliteRecipeRepository<'_>> {
    RecipeService::new(SqliteRecipeRepository::try_new(conn).unwrap())
}

fn lists(conn: &Connection) -> TaskListService<SqliteListRepository<'_>> {
    TaskListService::new(SqliteListRepository::try_new(conn).unwrap())
}

fn merger(
    conn: &Connection,
) -> IngredientMergeService<SqliteRecipeRepository<'_>, SqliteListRepository<'_>> {
    IngredientMergeService::new(
        SqliteRecipeRepository::try_new(conn).unwrap(),
        SqliteListRepository::try_new(conn).unwrap(),
    )
}

fn pancake_lines() -> Vec<String> {
    parse_ingredient_block("200g flour\n\n  2 eggs\n300ml milk\n")
}

fn photo(file_name: &str, mime_type: &str) -> NewRecipePhoto {
    NewRecipePhoto {
        file_name: file_name.to_string(),
        original_name: format!("original-{file_name}"),
        mime_type: mime_type.to_string(),
        file_size: 2048,
    }
}

#[test]
fn ingredient_block_parsing_drops_blank_lines() {
    assert_eq!(pancake_lines(), vec!["200g flour", "2 eggs", "300ml milk"]);
}

#[test]
fn merge_follows_ingredient_order_not_click_order() {
    let conn = open_db_in_memory().unwrap();
    let recipe = recipes(&conn)
        .create_recipe("Pancakes", pancake_lines(), "Whisk and fry.")
        .unwrap();
    let list = lists(&conn).create_list("Shopping").unwrap();

    let created = merger(&conn)
        .merge_ingredients_to_list(recipe.id, list.id, &[2, 0])
        .unwrap();

    let texts: Vec<_> = created.iter().map(|task| task.text.as_str()).collect();
    assert_eq!(texts, vec!["200g flour", "300ml milk"]);
    assert!(created[0].position < created[1].position);
    assert!(created.iter().all(|task| !task.completed));
}

#[test]
fn merge_appends_after_existing_tasks_without_dedup() {
    let conn = open_db_in_memory().unwrap();
    let recipe = recipes(&conn)
        .create_recipe("Pancakes", pancake_lines(), "")
        .unwrap();
    let list_service = lists(&conn);
    let list = list_service.create_list("Shopping").unwrap();
    let existing = list_service.append_task(list.id, "2 eggs").unwrap();

    merger(&conn)
        .merge_ingredients_to_list(recipe.id, list.id, &recipe.all_ingredient_indices())
        .unwrap();

    let texts: Vec<_> = list_service
        .tasks(list.id)
        .unwrap()
        .into_iter()
        .map(|task| task.text)
        .collect();
    assert_eq!(texts, vec!["2 eggs", "200g flour", "2 eggs", "300ml milk"]);
    assert_eq!(list_service.tasks(list.id).unwrap()[0].id, existing.id);
}

#[test]
fn empty_selection_creates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let recipe = recipes(&conn)
        .create_recipe("Pancakes", pancake_lines(), "")
        .unwrap();
    let list = lists(&conn).create_list("Shopping").unwrap();

    let created = merger(&conn)
        .merge_ingredients_to_list(recipe.id, list.id, &[])
        .unwrap();

    assert!(created.is_empty());
    assert!(lists(&conn).tasks(list.id).unwrap().is_empty());
}

#[test]
fn out_of_range_selection_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let recipe = recipes(&conn)
        .create_recipe("Pancakes", pancake_lines(), "")
        .unwrap();
    let list = lists(&conn).create_list("Shopping").unwrap();

    let err = merger(&conn)
        .merge_ingredients_to_list(recipe.id, list.id, &[0, 7])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::SelectionOutOfRange { index: 7, len: 3 })
    ));
    assert!(lists(&conn).tasks(list.id).unwrap().is_empty());
}

#[test]
fn merge_with_unknown_targets_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let recipe = recipes(&conn)
        .create_recipe("Pancakes", pancake_lines(), "")
        .unwrap();
    let list = lists(&conn).create_list("Shopping").unwrap();
    let merger = merger(&conn);

    let missing_recipe = merger
        .merge_ingredients_to_list(Uuid::new_v4(), list.id, &[0])
        .unwrap_err();
    let missing_list = merger
        .merge_ingredients_to_list(recipe.id, Uuid::new_v4(), &[0])
        .unwrap_err();

    assert_eq!(missing_recipe.kind(), ErrorKind::NotFound);
    assert_eq!(missing_list.kind(), ErrorKind::NotFound);
}

#[test]
fn merge_lines_uses_same_selection_rule() {
    let conn = open_db_in_memory().unwrap();
    let list = lists(&conn).create_list("Week shop").unwrap();
    let lines = vec!["rice".to_string(), "beans".to_string(), "salsa".to_string()];

    let created = merger(&conn)
        .merge_lines_to_list(list.id, &lines, &[1, 1, 0])
        .unwrap();

    let texts: Vec<_> = created.into_iter().map(|task| task.text).collect();
    assert_eq!(texts, vec!["rice", "beans"]);
}

#[test]
fn update_replaces_ingredients_and_keeps_identity() {
    let conn = open_db_in_memory().unwrap();
    let service = recipes(&conn);
    let recipe = service
        .create_recipe("  Pancakes ", pancake_lines(), "")
        .unwrap();
    assert_eq!(recipe.title, "Pancakes");

    let updated = service
        .update_recipe(
            recipe.id,
            RecipeDraft::new("Crepes", vec!["flour".to_string()], "Thin."),
        )
        .unwrap();

    assert_eq!(updated.id, recipe.id);
    assert_eq!(updated.ingredients, vec!["flour"]);
    assert_eq!(service.get_recipe(recipe.id).unwrap().title, "Crepes");
}

#[test]
fn blank_recipe_input_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = recipes(&conn);

    let blank_title = service.create_recipe("  ", Vec::new(), "").unwrap_err();
    let blank_line = service
        .create_recipe(
            "Soup",
            vec!["water".to_string(), String::new(), "salt".to_string()],
            "",
        )
        .unwrap_err();

    assert_eq!(blank_title.kind(), ErrorKind::ValidationFailure);
    assert!(matches!(
        blank_line,
        ServiceError::Validation(ValidationError::EmptyIngredientLine { index: 1 })
    ));
    assert!(service.recipes().unwrap().is_empty());
}

#[test]
fn recipes_are_listed_alphabetically() {
    let conn = open_db_in_memory().unwrap();
    let service = recipes(&conn);
    for title in ["waffles", "Apple pie", "banana bread"] {
        service.create_recipe(title, Vec::new(), "").unwrap();
    }

    let titles: Vec<_> = service
        .recipes()
        .unwrap()
        .into_iter()
        .map(|recipe| recipe.title)
        .collect();
    assert_eq!(titles, vec!["Apple pie", "banana bread", "waffles"]);
}

#[test]
fn photos_keep_upload_order_and_limit() {
    let conn = open_db_in_memory().unwrap();
    let service = recipes(&conn);
    let recipe = service.create_recipe("Pancakes", Vec::new(), "").unwrap();

    for index in 0..10 {
        service
            .add_photo(recipe.id, photo(&format!("p{index}.jpg"), "image/jpeg"))
            .unwrap();
    }
    let over_limit = service
        .add_photo(recipe.id, photo("p10.jpg", "image/jpeg"))
        .unwrap_err();
    assert_eq!(over_limit.kind(), ErrorKind::ValidationFailure);

    let photos = service.photos(recipe.id).unwrap();
    assert_eq!(photos.len(), 10);
    assert_eq!(photos[0].file_name, "p0.jpg");
    assert_eq!(photos[9].file_name, "p9.jpg");

    assert_eq!(service.remove_photo(photos[0].id).unwrap(), DeleteOutcome::Removed);
    assert_eq!(
        service.remove_photo(photos[0].id).unwrap(),
        DeleteOutcome::AlreadyAbsent
    );
    let next = service
        .add_photo(recipe.id, photo("p10.png", "image/png"))
        .unwrap();
    assert!(next.upload_order > photos[9].upload_order);
}

#[test]
fn unsupported_photo_type_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = recipes(&conn);
    let recipe = service.create_recipe("Pancakes", Vec::new(), "").unwrap();

    let err = service
        .add_photo(recipe.id, photo("scan.gif", "image/gif"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    assert!(service.photos(recipe.id).unwrap().is_empty());
}

#[test]
fn deleting_recipe_removes_its_photos() {
    let conn = open_db_in_memory().unwrap();
    let service = recipes(&conn);
    let recipe = service.create_recipe("Pancakes", pancake_lines(), "").unwrap();
    service
        .add_photo(recipe.id, photo("stack.webp", "image/webp"))
        .unwrap();

    service.delete_recipe(recipe.id).unwrap();

    assert_eq!(service.get_recipe(recipe.id).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(service.delete_recipe(recipe.id).unwrap_err().kind(), ErrorKind::NotFound);
    let photos: i64 = conn
        .query_row("SELECT COUNT(*) FROM recipe_photos;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(photos, 0);
}
