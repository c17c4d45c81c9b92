//! Helpers for integration tests.
#![allow(dead_code)]

use std::sync::Mutex;

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use foodgram::db::{DbPool, establish_connection_pool};
use foodgram::domain::ingredient::{Ingredient, NewIngredient};
use foodgram::domain::tag::{NewTag, Tag};
use foodgram::domain::user::{NewUser, User};
use foodgram::media::{ImageError, ImageStore, ImageUpload};
use foodgram::repository::{DieselRepository, IngredientWriter, TagWriter, UserWriter};
use foodgram::short_code::CodeSource;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// 1x1 transparent PNG.
pub const PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

pub fn user(repo: &DieselRepository, username: &str) -> User {
    repo.create_user(&NewUser::new(
        format!("{username}@example.com"),
        username,
        "Test",
        "Cook",
    ))
    .expect("user should be created")
}

pub fn ingredient(repo: &DieselRepository, name: &str, unit: &str) -> Ingredient {
    repo.create_ingredient(&NewIngredient::new(name, unit))
        .expect("ingredient should be created")
}

pub fn tag(repo: &DieselRepository, name: &str) -> Tag {
    repo.create_tag(&NewTag::new(name))
        .expect("tag should be created")
}

/// Image store that keeps nothing and records what it was asked to do.
#[derive(Default)]
pub struct MemoryImages {
    pub stored: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<String>>,
}

impl MemoryImages {
    pub fn stored(&self) -> Vec<String> {
        self.stored.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ImageStore for MemoryImages {
    fn store(&self, image: &ImageUpload) -> Result<String, ImageError> {
        let mut stored = self.stored.lock().map_err(|_| ImageError::Empty)?;
        let reference = format!("/media/recipes/{}.{}", stored.len(), image.extension);
        stored.push(reference.clone());
        Ok(reference)
    }

    fn remove(&self, reference: &str) -> Result<(), ImageError> {
        let mut removed = self.removed.lock().map_err(|_| ImageError::Empty)?;
        removed.push(reference.to_string());
        Ok(())
    }
}

/// Code source replaying a fixed script, then a fallback.
pub struct ScriptedCodes {
    script: Mutex<Vec<String>>,
    fallback: String,
}

impl ScriptedCodes {
    pub fn new(script: &[&str], fallback: &str) -> Self {
        Self {
            script: Mutex::new(script.iter().rev().map(|code| code.to_string()).collect()),
            fallback: fallback.to_string(),
        }
    }
}

impl CodeSource for ScriptedCodes {
    fn next_code(&self) -> String {
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
