//! Grant command - manage the folders Telescope may search.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::local;
use crate::scope::{ArgsPicker, DirectoryPicker, NoPicker, PickerPrompt, StdinPicker};

#[derive(Args)]
pub struct GrantCmd {
    #[command(subcommand)]
    pub command: GrantSubCmd,
}

#[derive(Subcommand)]
pub enum GrantSubCmd {
    /// Replace all granted folders with the given ones
    Set(DirsArgs),

    /// Add folders to the granted set
    Add(DirsArgs),

    /// Remove the granted folder with this name (last path component)
    Remove(RemoveArgs),

    /// Remove all granted folders
    Clear,

    /// List granted folders
    List,
}

#[derive(Args)]
pub struct DirsArgs {
    /// Folders to grant (prompted for when omitted)
    pub dirs: Vec<PathBuf>,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Folder name, e.g. "Downloads"
    pub name: String,
}

impl DirsArgs {
    fn picker(&self) -> Box<dyn DirectoryPicker> {
        if !self.dirs.is_empty() {
            Box::new(ArgsPicker::new(self.dirs.clone()))
        } else if std::io::stdin().is_terminal() {
            Box::new(StdinPicker)
        } else {
            Box::new(NoPicker)
        }
    }
}

impl GrantCmd {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            GrantSubCmd::Set(args) => {
                let mut manager = local::open_scope_manager(args.picker())?;
                let roots = manager
                    .request_new_grant(&PickerPrompt::grant())
                    .context("Failed to grant folders")?;
                print_roots("Granted", &roots);
            }
            GrantSubCmd::Add(args) => {
                let mut manager = local::open_scope_manager(args.picker())?;
                let roots = manager
                    .add_to_grant(&PickerPrompt::add())
                    .context("Failed to add folders")?;
                print_roots("Now granted", &roots);
            }
            GrantSubCmd::Remove(args) => {
                let mut manager = local::open_scope_manager(Box::new(NoPicker))?;
                let before = manager.granted_folder_names();
                manager.revoke(&args.name).context("Failed to remove folder")?;

                if manager.granted_folder_names().len() < before.len() {
                    println!("Removed '{}'.", args.name);
                } else {
                    println!("No granted folder named '{}'.", args.name);
                }
            }
            GrantSubCmd::Clear => {
                let mut manager = local::open_scope_manager(Box::new(NoPicker))?;
                manager.revoke_all().context("Failed to clear grants")?;
                println!("All folder grants removed.");
            }
            GrantSubCmd::List => {
                let manager = local::open_scope_manager(Box::new(NoPicker))?;
                let names = manager.granted_folder_names();

                if names.is_empty() {
                    println!("No folders granted yet. Run `telescope grant add <dir>`.");
                    return Ok(());
                }

                for name in &names {
                    println!("{}", name);
                }
                println!("\n{} folders", names.len());
            }
        }
        Ok(())
    }
}

fn print_roots(label: &str, roots: &[PathBuf]) {
    println!("{} {} folder(s):", label, roots.len());
    for root in roots {
        println!("  {}", root.display());
    }
}
