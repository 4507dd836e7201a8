use crate::error::StoreError;
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const BEST_SCORE_KEY: &str = "bestScore";
const STORE_ENV: &str = "DIGIT_GUESS_STORE";
const STORE_FILE: &str = ".digit-guess.json";

pub trait ScoreStore
{
    fn load_best(&self) -> Result<Option<u32>, StoreError>;
    fn save_best(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Reads the best score, treating any failure as "no score yet".
pub fn load_best_or_unset(store: &dyn ScoreStore) -> Option<u32>
{
    match store.load_best() {
        Ok(best) => best,
        Err(err) => {
            log::warn!("Couldn't read best score, starting without one: {err}");
            None
        }
    }
}

/// Key-value JSON file. Other keys in the file are preserved on save.
pub struct FileStore
{
    path: PathBuf,
}

impl FileStore
{
    pub fn new(path: impl Into<PathBuf>) -> Self
    {
        Self { path: path.into() }
    }

    /// `DIGIT_GUESS_STORE`, then `$HOME/.digit-guess.json`, then the working directory.
    pub fn default_path() -> PathBuf
    {
        if let Ok(path) = env::var(STORE_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        match env::var_os("HOME") {
            Some(home) => Path::new(&home).join(STORE_FILE),
            None => PathBuf::from(STORE_FILE),
        }
    }

    pub fn path(&self) -> &Path
    {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, StoreError>
    {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl ScoreStore for FileStore
{
    fn load_best(&self) -> Result<Option<u32>, StoreError>
    {
        let map = self.read_map()?;
        let best = map
            .get(BEST_SCORE_KEY)
            .map(|value| serde_json::from_value::<u32>(value.clone()))
            .transpose()?;
        Ok(best)
    }

    fn save_best(&mut self, score: u32) -> Result<(), StoreError>
    {
        // A corrupt file gets replaced rather than blocking the save.
        let mut map = self.read_map().unwrap_or_default();
        map.insert(BEST_SCORE_KEY.to_string(), Value::from(score));
        let text = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, text)?;
        log::debug!("Saved best score {score} to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore
{
    best: Option<u32>,
}

#[cfg(test)]
impl ScoreStore for MemoryStore
{
    fn load_best(&self) -> Result<Option<u32>, StoreError>
    {
        Ok(self.best)
    }

    fn save_best(&mut self, score: u32) -> Result<(), StoreError>
    {
        self.best = Some(score);
        Ok(())
    }
}
