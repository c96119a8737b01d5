use chrono::Utc;
use sqlx::SqliteConnection;

use super::expect_affected;
use crate::errors::{AppError, AppResult};
use crate::models::{Dataset, DatasetChanges, DatasetContent, NewDataset, Page};

pub async fn create(conn: &mut SqliteConnection, new: &NewDataset) -> AppResult<Dataset> {
    let dataset = sqlx::query_as::<_, Dataset>(
        "INSERT INTO datasets (user_id, name, description, content, file_path, uploaded_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(new.user_id)
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.content.inline_bytes())
    .bind(new.content.file_path())
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    Ok(dataset)
}

pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Dataset> {
    sqlx::query_as::<_, Dataset>("SELECT * FROM datasets WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("dataset", id))
}

pub async fn list_by_owner(
    conn: &mut SqliteConnection,
    user_id: i64,
    page: Page,
) -> AppResult<Vec<Dataset>> {
    let datasets = sqlx::query_as::<_, Dataset>(
        "SELECT * FROM datasets
         WHERE user_id = ?
         ORDER BY uploaded_at ASC, id ASC
         LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(conn)
    .await?;
    Ok(datasets)
}

/// Datasets attached to a project, in upload order.
pub async fn list_by_project(conn: &mut SqliteConnection, project_id: i64) -> AppResult<Vec<Dataset>> {
    let datasets = sqlx::query_as::<_, Dataset>(
        "SELECT d.* FROM datasets d
         JOIN project_datasets pd ON pd.dataset_id = d.id
         WHERE pd.project_id = ?
         ORDER BY d.uploaded_at ASC, d.id ASC",
    )
    .bind(project_id)
    .fetch_all(conn)
    .await?;
    Ok(datasets)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    changes: &DatasetChanges,
) -> AppResult<Dataset> {
    let replace_content = changes.content.is_some();
    let (inline, file_path) = match &changes.content {
        Some(DatasetContent::Inline(bytes)) => (Some(bytes.as_slice()), None),
        Some(DatasetContent::FilePath(path)) => (None, Some(path.as_str())),
        None => (None, None),
    };

    sqlx::query_as::<_, Dataset>(
        "UPDATE datasets
         SET name = COALESCE(?1, name),
             description = COALESCE(?2, description),
             content = CASE WHEN ?3 THEN ?4 ELSE content END,
             file_path = CASE WHEN ?3 THEN ?5 ELSE file_path END
         WHERE id = ?6
         RETURNING *",
    )
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(replace_content)
    .bind(inline)
    .bind(file_path)
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::not_found("dataset", id))
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM datasets WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    expect_affected(result, "dataset", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;
    use crate::test_util::{new_dataset, seed_user};
    use std::collections::HashSet;

    #[actix_web::test]
    async fn inline_content_round_trips() {
        let store = Store::in_memory().await;
        let mut conn = store.pool().acquire().await.unwrap();
        let user = seed_user(&mut conn, "d@x.com").await;

        let new = NewDataset {
            description: Some("iris".into()),
            content: DatasetContent::Inline(b"a,b\n1,2\n".to_vec()),
            ..new_dataset(user.id, "iris")
        };
        let created = create(&mut conn, &new).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.user_id, user.id);
        assert_eq!(created.name, "iris");
        assert_eq!(created.description.as_deref(), Some("iris"));
        assert_eq!(created.content, new.content);

        assert_eq!(get_by_id(&mut conn, created.id).await.unwrap(), created);
    }

    #[actix_web::test]
    async fn file_path_content_round_trips() {
        let store = Store::in_memory().await;
        let mut conn = store.pool().acquire().await.unwrap();
        let user = seed_user(&mut conn, "d@x.com").await;

        let created = create(&mut conn, &new_dataset(user.id, "sales")).await.unwrap();
        assert_eq!(created.content.file_path(), Some("/data/sales.csv"));
        assert_eq!(get_by_id(&mut conn, created.id).await.unwrap(), created);
    }

    #[actix_web::test]
    async fn unknown_owner_is_rejected() {
        let store = Store::in_memory().await;
        let mut conn = store.pool().acquire().await.unwrap();

        let result = create(&mut conn, &new_dataset(404, "orphan")).await;
        assert!(matches!(result, Err(AppError::ConstraintViolation(_))));
    }

    #[actix_web::test]
    async fn pages_are_disjoint_and_stable() {
        let store = Store::in_memory().await;
        let mut conn = store.pool().acquire().await.unwrap();
        let user = seed_user(&mut conn, "d@x.com").await;
        let other = seed_user(&mut conn, "e@x.com").await;
        for i in 0..10 {
            create(&mut conn, &new_dataset(user.id, &format!("ds{}", i))).await.unwrap();
        }
        create(&mut conn, &new_dataset(other.id, "foreign")).await.unwrap();

        let first = list_by_owner(&mut conn, user.id, Page::new(5, 0)).await.unwrap();
        let second = list_by_owner(&mut conn, user.id, Page::new(5, 5)).await.unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(second.len(), 5);

        let first_ids: HashSet<i64> = first.iter().map(|d| d.id).collect();
        assert!(second.iter().all(|d| !first_ids.contains(&d.id)));
        assert!(first.iter().chain(&second).all(|d| d.user_id == user.id));

        let again = list_by_owner(&mut conn, user.id, Page::new(5, 0)).await.unwrap();
        assert_eq!(again, first);
        assert_eq!(first[0].name, "ds0");
    }

    #[actix_web::test]
    async fn update_replaces_content_and_keeps_the_rest() {
        let store = Store::in_memory().await;
        let mut conn = store.pool().acquire().await.unwrap();
        let user = seed_user(&mut conn, "d@x.com").await;
        let dataset = create(&mut conn, &new_dataset(user.id, "sales")).await.unwrap();

        let changes = DatasetChanges {
            content: Some(DatasetContent::Inline(b"x\n".to_vec())),
            ..Default::default()
        };
        let updated = update(&mut conn, dataset.id, &changes).await.unwrap();
        assert_eq!(updated.content, DatasetContent::Inline(b"x\n".to_vec()));
        assert_eq!(updated.name, dataset.name);
        assert_eq!(updated.uploaded_at, dataset.uploaded_at);

        let renamed = update(
            &mut conn,
            dataset.id,
            &DatasetChanges {
                name: Some("renamed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "renamed");
        assert_eq!(renamed.content, updated.content);
        assert_eq!(get_by_id(&mut conn, dataset.id).await.unwrap(), renamed);
    }

    #[actix_web::test]
    async fn delete_then_get_is_not_found() {
        let store = Store::in_memory().await;
        let mut conn = store.pool().acquire().await.unwrap();
        let user = seed_user(&mut conn, "d@x.com").await;
        let dataset = create(&mut conn, &new_dataset(user.id, "sales")).await.unwrap();

        delete(&mut conn, dataset.id).await.unwrap();
        assert!(matches!(
            get_by_id(&mut conn, dataset.id).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            delete(&mut conn, dataset.id).await,
            Err(AppError::NotFound { .. })
        ));
    }
}
