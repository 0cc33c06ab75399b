use std::path::Path;
use std::process::Command;

use anyhow::{Context, bail};

/// What the underlying file/storage layer hands back for a user-chosen
/// reference: a stable identifier, a display name, and the folder flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRef {
    pub id: String,
    pub display_name: String,
    pub is_folder: bool,
}

/// Opaque reference resolver over the file/storage layer. The canvas never
/// touches file contents; it only needs stable ids and display names.
pub trait ReferenceResolver {
    fn resolve(&self, raw: &Path) -> anyhow::Result<ResolvedRef>;
}

/// Resolver backed by the local filesystem. The stable id is the
/// canonicalized path string, so re-adding the same file dedupes across
/// sessions and folder ids double as sync roots.
pub struct FsResolver;

impl ReferenceResolver for FsResolver {
    fn resolve(&self, raw: &Path) -> anyhow::Result<ResolvedRef> {
        let canonical = raw
            .canonicalize()
            .with_context(|| format!("cannot resolve {}", raw.display()))?;
        let display_name = canonical
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| canonical.display().to_string());
        Ok(ResolvedRef {
            id: canonical.to_string_lossy().into_owned(),
            display_name,
            is_folder: canonical.is_dir(),
        })
    }
}

/// Hand a resolved reference to the OS default handler. Failure to spawn
/// (no capable handler, missing target) is reported to the caller; nothing
/// else changes.
pub fn open_reference(id: &str) -> anyhow::Result<()> {
    if !Path::new(id).exists() {
        bail!("{} no longer exists", id);
    }
    #[cfg(target_os = "macos")]
    let mut cmd = {
        let mut c = Command::new("open");
        c.arg(id);
        c
    };
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", id]);
        c
    };
    #[cfg(all(unix, not(target_os = "macos")))]
    let mut cmd = {
        let mut c = Command::new("xdg-open");
        c.arg(id);
        c
    };
    cmd.spawn()
        .with_context(|| format!("no handler available for {id}"))?;
    Ok(())
}
