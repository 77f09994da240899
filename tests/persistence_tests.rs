//! Durability and namespace behaviour of the fjall backend.

#![cfg(feature = "fjall")]

mod common;

use common::*;
use typed_store::{Backend, Config, FjallBackend, TypedStore};

#[test]
fn values_survive_reopen() -> anyhow::Result<()> {
    let dir = temp_dir();

    {
        let mut store = fjall_store(&dir, "prefs");
        store.store_bool("onboarded", true)?;
        store.store_f64("ratio", 0.75)?;
        store.store_list_i64("history", &[3, 1, 2])?;
        store.store_object("user", &tatang())?;
        store.store_list_object("friends", &[bejo(), tatang()])?;
    }

    let store = fjall_store(&dir, "prefs");
    assert!(store.get_bool("onboarded", false)?);
    assert_eq!(store.get_f64("ratio", 0.0)?, 0.75);
    assert_eq!(store.get_list_i64("history")?, vec![3, 1, 2]);
    assert_eq!(store.get_object::<User>("user")?, tatang());
    assert_eq!(
        store.get_list_object::<User>("friends")?,
        vec![bejo(), tatang()]
    );
    Ok(())
}

#[test]
fn removal_survives_reopen() -> anyhow::Result<()> {
    let dir = temp_dir();

    {
        let mut store = fjall_store(&dir, "prefs");
        store.store_i32("a", 1)?;
        store.store_i32("b", 2)?;
        store.remove("a")?;
    }

    let store = fjall_store(&dir, "prefs");
    assert_eq!(store.keys()?, vec!["b"]);
    assert_eq!(store.get_i32("a", -1)?, -1);
    Ok(())
}

#[test]
fn clear_only_touches_own_namespace() -> anyhow::Result<()> {
    let dir = temp_dir();

    {
        let mut first = fjall_store(&dir, "first");
        first.store_string("shared-key", "first")?;
    }
    {
        let mut second = fjall_store(&dir, "second");
        second.store_string("shared-key", "second")?;
        second.clear()?;
        assert_eq!(second.get_string("shared-key")?, None);
    }

    let first = fjall_store(&dir, "first");
    assert_eq!(first.get_string("shared-key")?.as_deref(), Some("first"));
    Ok(())
}

#[test]
fn open_from_config_file() -> anyhow::Result<()> {
    let dir = temp_dir();
    let config_path = dir.path().join("typed-store.toml");
    let db_path = dir.path().join("db");
    std::fs::write(
        &config_path,
        format!(
            "[store]\npath = {:?}\nnamespace = \"app\"\ndurability = \"sync-data\"\n",
            db_path.display().to_string()
        ),
    )?;

    let config = Config::from_file(&config_path)?;
    let mut store = TypedStore::open(&config.store)?;
    assert_eq!(store.backend().namespace(), "app");
    store.store_string("k", "v")?;
    drop(store);

    let backend = FjallBackend::open(&db_path, "app")?;
    assert!(backend.contains("k")?);
    Ok(())
}

#[test]
fn invalid_namespace_is_rejected() {
    let dir = temp_dir();
    let err = TypedStore::open(&typed_store::StoreConfig::new(dir.path(), "no/slashes")).err();
    assert!(err.is_some_and(|e| e.is_backend()));
}
