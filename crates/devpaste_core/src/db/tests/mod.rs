//! Database integration tests.

use super::*;
use crate::models::paste::*;
use crate::test_support::{sample_paste, setup_temp_db};
use chrono::{Duration, Utc};
use std::sync::{Arc, Barrier};
use std::thread;


fn insert_sample(db: &Database, id: &str) -> Paste {
    let mut paste = sample_paste(id);
    db.pastes.insert(&mut paste).expect("insert");
    paste
}
