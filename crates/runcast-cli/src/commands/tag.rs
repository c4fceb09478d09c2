use std::path::Path;

use runcast_core::resolve_version_tag;

use super::load_config;

/// Print the version tag `runcast deploy` would attach.
///
/// An unresolvable tag is not an error: the warning goes to stderr and
/// nothing is printed.
pub fn tag(config_path: Option<&Path>) -> anyhow::Result<()> {
    let (config, workspace_root) = load_config(config_path)?;

    let Some(kind) = config.deploy.tag_with_version else {
        anyhow::bail!(
            "tag_with_version is not set — set [deploy].tag_with_version to \"node\", \"python\" or \"cargo\""
        );
    };

    let resolved = resolve_version_tag(&workspace_root.join(&config.target.root), kind);
    match resolved.tag {
        Some(tag) => println!("{tag}"),
        None => {
            for warning in &resolved.warnings {
                eprintln!("warning: {warning}");
            }
        }
    }

    Ok(())
}
