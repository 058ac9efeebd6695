//! SQLite course and teaching class repository implementation.

use gradebook_core::repository::course::CourseRepository;
use gradebook_types::academic::{Course, TeachingClass};
use gradebook_types::error::RepositoryError;
use sqlx::Row;

use super::map_sqlx_error;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `CourseRepository`.
pub struct SqliteCourseRepository {
    pool: DatabasePool,
}

impl SqliteCourseRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn course_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Course, RepositoryError> {
    Ok(Course {
        cid: row.try_get("cid").map_err(map_sqlx_error)?,
        name: row.try_get("name").map_err(map_sqlx_error)?,
    })
}

fn class_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TeachingClass, RepositoryError> {
    let term: i64 = row.try_get("term").map_err(map_sqlx_error)?;
    Ok(TeachingClass {
        tcid: row.try_get("tcid").map_err(map_sqlx_error)?,
        cid: row.try_get("cid").map_err(map_sqlx_error)?,
        tid: row.try_get("tid").map_err(map_sqlx_error)?,
        term: u32::try_from(term)
            .map_err(|e| RepositoryError::Query(format!("invalid term: {e}")))?,
        name: row.try_get("name").map_err(map_sqlx_error)?,
    })
}

impl CourseRepository for SqliteCourseRepository {
    async fn create_course(&self, course: &Course) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO courses (cid, name) VALUES (?, ?)")
            .bind(&course.cid)
            .bind(&course.name)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn get_course(&self, cid: &str) -> Result<Option<Course>, RepositoryError> {
        let row = sqlx::query("SELECT cid, name FROM courses WHERE cid = ?")
            .bind(cid)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(course_from_row).transpose()
    }

    async fn list_courses(&self) -> Result<Vec<Course>, RepositoryError> {
        let rows = sqlx::query("SELECT cid, name FROM courses ORDER BY cid")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(course_from_row).collect()
    }

    async fn create_class(&self, class: &TeachingClass) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO teaching_classes (tcid, cid, tid, term, name)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&class.tcid)
        .bind(&class.cid)
        .bind(&class.tid)
        .bind(i64::from(class.term))
        .bind(&class.name)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn get_class(&self, tcid: &str) -> Result<Option<TeachingClass>, RepositoryError> {
        let row = sqlx::query(
            "SELECT tcid, cid, tid, term, name FROM teaching_classes WHERE tcid = ?",
        )
        .bind(tcid)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;
        row.as_ref().map(class_from_row).transpose()
    }

    async fn list_classes(&self) -> Result<Vec<TeachingClass>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT tcid, cid, tid, term, name FROM teaching_classes ORDER BY tcid",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;
        rows.iter().map(class_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gradebook_core::repository::account::AccountRepository;
    use gradebook_types::academic::{Account, Role};

    use crate::sqlite::account::SqliteAccountRepository;
    use crate::sqlite::test_support::test_pool;

    async fn seed_teacher(pool: &DatabasePool) {
        SqliteAccountRepository::new(pool.clone())
            .create(&Account {
                user_id: "teacher1".to_string(),
                role: Role::Teacher,
                name: "Margaret Hale".to_string(),
                gender: "F".to_string(),
                age: None,
                password_hash: "x".to_string(),
            })
            .await
            .unwrap();
    }

    fn class(tcid: &str, cid: &str) -> TeachingClass {
        TeachingClass {
            tcid: tcid.to_string(),
            cid: cid.to_string(),
            tid: "teacher1".to_string(),
            term: 2,
            name: format!("{cid} section {tcid}"),
        }
    }

    #[tokio::test]
    async fn test_courses_round_trip() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteCourseRepository::new(pool);

        for (cid, name) in [("math101", "Calculus I"), ("Eng101", "English")] {
            repo.create_course(&Course {
                cid: cid.to_string(),
                name: name.to_string(),
            })
            .await
            .unwrap();
        }

        let course = repo.get_course("math101").await.unwrap().unwrap();
        assert_eq!(course.name, "Calculus I");
        assert!(repo.get_course("bio1").await.unwrap().is_none());

        let all = repo.list_courses().await.unwrap();
        // SQLite's default collation is binary: uppercase sorts first.
        assert_eq!(all[0].cid, "Eng101");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_classes_round_trip() {
        let (pool, _dir) = test_pool().await;
        seed_teacher(&pool).await;
        let repo = SqliteCourseRepository::new(pool);
        repo.create_course(&Course {
            cid: "math101".to_string(),
            name: "Calculus I".to_string(),
        })
        .await
        .unwrap();

        repo.create_class(&class("tc002", "math101")).await.unwrap();
        repo.create_class(&class("tc001", "math101")).await.unwrap();

        assert_eq!(
            repo.get_class("tc001").await.unwrap(),
            Some(class("tc001", "math101"))
        );
        let tcids: Vec<String> = repo
            .list_classes()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.tcid)
            .collect();
        assert_eq!(tcids, vec!["tc001", "tc002"]);
    }

    #[tokio::test]
    async fn test_class_requires_existing_course() {
        let (pool, _dir) = test_pool().await;
        seed_teacher(&pool).await;
        let repo = SqliteCourseRepository::new(pool);

        let err = repo.create_class(&class("tc001", "nope")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
