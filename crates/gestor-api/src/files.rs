// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gestor_app::{ClienteId, CotizacionId};

pub const APP_NAME: &str = "gestor";

/// Per-tenant logo cache, `<data_dir>/gestor/tenant/<n>/clientes/`.
pub fn logo_cache_dir(tenant: i64) -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set [storage].cache_dir in the config")
    })?;
    let dir = data_root
        .join(APP_NAME)
        .join("tenant")
        .join(tenant.to_string())
        .join("clientes");
    fs::create_dir_all(&dir)
        .with_context(|| format!("create cache directory {}", dir.display()))?;
    Ok(dir)
}

pub fn cached_logo_path(cache_dir: &Path, id: ClienteId) -> PathBuf {
    cache_dir.join(format!("{}.png", id.get()))
}

pub fn store_logo(cache_dir: &Path, id: ClienteId, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(cache_dir)
        .with_context(|| format!("create cache directory {}", cache_dir.display()))?;
    let path = cached_logo_path(cache_dir, id);
    fs::write(&path, bytes).with_context(|| format!("write logo cache {}", path.display()))?;
    Ok(path)
}

/// Deterministic download name for a quotation PDF.
pub fn pdf_file_name(id: CotizacionId) -> String {
    format!("cotizacion_{}.pdf", id.get())
}

pub fn write_pdf(dir: &Path, id: CotizacionId, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;
    let path = dir.join(pdf_file_name(id));
    fs::write(&path, bytes).with_context(|| format!("write PDF {}", path.display()))?;
    Ok(path)
}

/// Remove cache files whose mtime is older than the TTL. A non-positive TTL
/// disables eviction.
pub fn evict_stale_cache(dir: &Path, ttl_days: i64) -> Result<usize> {
    if ttl_days <= 0 {
        return Ok(0);
    }
    if !dir.exists() {
        return Ok(0);
    }

    let ttl_secs = u64::try_from(ttl_days)
        .ok()
        .and_then(|days| days.checked_mul(24 * 60 * 60))
        .ok_or_else(|| anyhow!("ttl_days is too large: {ttl_days}"))?;
    let ttl = Duration::from_secs(ttl_secs);
    let now = std::time::SystemTime::now();

    let mut removed = 0usize;
    for entry in fs::read_dir(dir).with_context(|| format!("read cache dir {}", dir.display()))? {
        let entry = entry?;
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(_) => continue,
        };
        if metadata.is_dir() {
            continue;
        }
        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(_) => continue,
        };
        if now.duration_since(modified).unwrap_or(Duration::ZERO) > ttl
            && fs::remove_file(entry.path()).is_ok()
        {
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::{cached_logo_path, evict_stale_cache, pdf_file_name, store_logo, write_pdf};
    use anyhow::Result;
    use gestor_app::{ClienteId, CotizacionId};

    #[test]
    fn pdf_name_is_deterministic_per_id() {
        assert_eq!(pdf_file_name(CotizacionId::new(42)), "cotizacion_42.pdf");
    }

    #[test]
    fn logo_store_and_lookup_round_trip() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let id = ClienteId::new(7);
        let stored = store_logo(temp.path(), id, b"png bytes")?;
        assert_eq!(stored, cached_logo_path(temp.path(), id));
        assert_eq!(std::fs::read(&stored)?, b"png bytes");
        Ok(())
    }

    #[test]
    fn write_pdf_creates_directory_and_file() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let target = temp.path().join("descargas");
        let path = write_pdf(&target, CotizacionId::new(3), b"%PDF-1.4")?;
        assert!(path.ends_with("cotizacion_3.pdf"));
        assert_eq!(std::fs::read(&path)?, b"%PDF-1.4");
        Ok(())
    }

    #[test]
    fn eviction_ignores_fresh_files_and_disabled_ttl() -> Result<()> {
        let temp = tempfile::tempdir()?;
        store_logo(temp.path(), ClienteId::new(1), b"fresh")?;

        assert_eq!(evict_stale_cache(temp.path(), 30)?, 0);
        assert_eq!(evict_stale_cache(temp.path(), 0)?, 0);
        assert_eq!(evict_stale_cache(&temp.path().join("missing"), 30)?, 0);
        Ok(())
    }
}
