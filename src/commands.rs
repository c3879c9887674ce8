// Command dispatch
use crate::cli::Command;
use crate::config::Config;
use crate::repository;
use crate::utils::file::{join_under, resolve_path};
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

/// Where a command runs: the configuration file it reads and writes, and
/// the local directory `get` and `put` are relative to.
pub struct App {
    config_path: PathBuf,
    work_dir: PathBuf,
}

impl App {
    pub fn new<C: Into<PathBuf>, W: Into<PathBuf>>(config_path: C, work_dir: W) -> Self {
        App {
            config_path: config_path.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Loads the configuration and runs `command` against it. `set` and `cd`
    /// save the configuration once their change has succeeded.
    pub fn execute<W: Write>(&self, command: &Command, out: &mut W) -> Result<()> {
        let mut config = Config::load(&self.config_path)?;
        self.apply(command, &mut config, out)
    }

    pub fn apply<W: Write>(&self, command: &Command, config: &mut Config, out: &mut W) -> Result<()> {
        match command {
            Command::List => self.list(config, out),
            Command::Set(name) => self.set(config, name, out),
            Command::Show => self.show(config, out),
            Command::Get(name) => self.get(config, name, out),
            Command::Put(name) => self.put(config, name, out),
            Command::Cd(dir) => self.change_directory(config, dir, out),
        }
    }

    fn list<W: Write>(&self, config: &Config, out: &mut W) -> Result<()> {
        writeln!(out, "Available repositories:")?;
        for (name, repo) in &config.repositories {
            let marker = if *name == config.current { '*' } else { ' ' };
            writeln!(out, " {} {} ({}, {})", marker, name, repo.kind, repo.path)?;
        }
        Ok(())
    }

    fn set<W: Write>(&self, config: &mut Config, name: &str, out: &mut W) -> Result<()> {
        config.set_current(name)?;
        config.save(&self.config_path)?;
        writeln!(out, "Current repository set to '{}'.", name)?;
        Ok(())
    }

    fn show<W: Write>(&self, config: &Config, out: &mut W) -> Result<()> {
        let (name, repo) = config.current_repository()?;
        log::debug!("Listing repository '{}' at '{}'", name, repo.path);
        for entry in repository::open(repo).list()? {
            writeln!(out, "{}", entry)?;
        }
        Ok(())
    }

    fn get<W: Write>(&self, config: &Config, name: &str, out: &mut W) -> Result<()> {
        let (_, repo) = config.current_repository()?;
        let destination = join_under(&self.work_dir, name);
        let summary = repository::open(repo).get(name, &destination)?;
        writeln!(out, "Got '{}' into '{}': {}", name, destination.display(), summary)?;
        Ok(())
    }

    fn put<W: Write>(&self, config: &Config, name: &str, out: &mut W) -> Result<()> {
        let (_, repo) = config.current_repository()?;
        let source = resolve_path(&self.work_dir, name);
        let summary = repository::open(repo).put(&source, name)?;
        writeln!(out, "Put '{}': {}", source.display(), summary)?;
        Ok(())
    }

    fn change_directory<W: Write>(&self, config: &mut Config, dir: &str, out: &mut W) -> Result<()> {
        let new_path = {
            let (_, repo) = config.current_repository()?;
            repository::open(repo).change_directory(dir)?
        };

        config.current_repository_mut()?.path = new_path.clone();
        config.save(&self.config_path)?;
        writeln!(out, "Changed directory to '{}'", new_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepositoryConfig;
    use crate::utils::error::TransferError;
    use std::fs;
    use tempfile::tempdir;

    fn config_with(path: &str) -> Config {
        let mut config = Config::default();
        config
            .repositories
            .insert("home".to_string(), RepositoryConfig::local(path));
        config
            .repositories
            .insert("other".to_string(), RepositoryConfig::local("/srv/other"));
        config.current = "home".to_string();
        config
    }

    #[test]
    fn list_marks_current() {
        let dir = tempdir().unwrap();
        let app = App::new(dir.path().join("config.json"), dir.path());
        let mut out = Vec::new();
        app.apply(&Command::List, &mut config_with("/tmp/r"), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Available repositories:\n * home (local, /tmp/r)\n   other (local, /srv/other)\n"
        );
    }

    #[test]
    fn commands_need_a_current_repository() {
        let dir = tempdir().unwrap();
        let app = App::new(dir.path().join("config.json"), dir.path());
        let mut config = config_with("/tmp/r");
        config.current.clear();

        let err = app.apply(&Command::Show, &mut config, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TransferError>(),
            Some(TransferError::NoCurrentRepository)
        ));
    }

    #[test]
    fn failed_cd_does_not_save() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        let app = App::new(&config_path, dir.path());
        let mut config = config_with(&dir.path().display().to_string());

        assert!(app.apply(&Command::Cd("missing".into()), &mut config, &mut Vec::new()).is_err());
        assert!(!config_path.exists());
        assert_eq!(config.repositories["home"].path, dir.path().display().to_string());
    }

    #[test]
    fn put_copies_from_work_dir() {
        let repo = tempdir().unwrap();
        let work = tempdir().unwrap();
        fs::write(work.path().join("notes.txt"), "n").unwrap();

        let app = App::new(work.path().join("config.json"), work.path());
        let mut config = config_with(&repo.path().display().to_string());
        let mut out = Vec::new();
        app.apply(&Command::Put("notes.txt".into()), &mut config, &mut out).unwrap();

        assert_eq!(fs::read_to_string(repo.path().join("notes.txt")).unwrap(), "n");
        assert!(String::from_utf8(out).unwrap().starts_with("Put '"));
    }
}
