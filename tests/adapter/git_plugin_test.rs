//! Tests for the built-in git plugin

use std::path::Path;

use chrono::Utc;
use scmpoll::adapters::GitPlugin;
use scmpoll::adapters::git::{BRANCH_KEY, GitPluginError, URL_KEY};
use scmpoll::core::models::{RevisionData, ScmAction, ScmRevision};
use scmpoll::core::ports::{ScmPlugin, ScmProperty, ScmPropertyConfiguration};
use tempfile::TempDir;

use crate::common::git_repo::TempGitRepo;

fn config(url: &str) -> ScmPropertyConfiguration {
    let mut config = ScmPropertyConfiguration::new();
    config.add(ScmProperty::new(URL_KEY, url));
    config
}

fn previous(revision: &str) -> ScmRevision {
    ScmRevision::new(revision, Utc::now(), RevisionData::new())
}

fn ids(revisions: &[ScmRevision]) -> Vec<&str> {
    revisions.iter().map(|r| r.revision.as_str()).collect()
}

mod latest_revision {
    use super::*;

    #[test]
    fn reports_branch_tip() {
        let repo = TempGitRepo::new();
        repo.write_file("a.txt", "one");
        repo.commit_all("first");
        repo.write_file("b.txt", "two");
        let head = repo.commit_all("second\n\nwith body");
        let work = TempDir::new().unwrap();

        let rev = GitPlugin::new()
            .latest_revision(&config(&repo.url()), work.path())
            .unwrap()
            .unwrap();

        assert_eq!(rev.revision, head);
        assert_eq!(rev.user.as_deref(), Some("Test User"));
        assert_eq!(rev.revision_comment.as_deref(), Some("second\n\nwith body"));
        assert_eq!(rev.data.get(BRANCH_KEY).map(String::as_str), Some("master"));
        assert!(rev.timestamp <= Utc::now());

        let files = rev.modified_files.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "b.txt");
        assert_eq!(files[0].action, ScmAction::Added);
    }

    #[test]
    fn empty_repository_has_no_revision() {
        let repo = TempGitRepo::new();
        let work = TempDir::new().unwrap();

        let rev = GitPlugin::new().latest_revision(&config(&repo.url()), work.path()).unwrap();
        assert!(rev.is_none());
    }

    #[test]
    fn unknown_branch_has_no_revision() {
        let repo = TempGitRepo::new();
        repo.write_file("a.txt", "one");
        repo.commit_all("first");
        let work = TempDir::new().unwrap();

        let mut config = config(&repo.url());
        config.add(ScmProperty::new(BRANCH_KEY, "release"));

        let rev = GitPlugin::new().latest_revision(&config, work.path()).unwrap();
        assert!(rev.is_none());
    }

    #[test]
    fn follows_configured_branch() {
        let repo = TempGitRepo::new();
        repo.write_file("a.txt", "one");
        let base = repo.commit_all("first");
        repo.git(&["checkout", "-q", "-b", "release"]);
        repo.write_file("r.txt", "release");
        let release = repo.commit_all("release only");
        repo.git(&["checkout", "-q", "master"]);
        let work = TempDir::new().unwrap();

        let mut release_config = config(&repo.url());
        release_config.add(ScmProperty::new(BRANCH_KEY, "release"));

        let plugin = GitPlugin::new();
        let on_master = plugin.latest_revision(&config(&repo.url()), work.path()).unwrap().unwrap();
        let on_release = plugin.latest_revision(&release_config, work.path()).unwrap().unwrap();

        assert_eq!(on_master.revision, base);
        assert_eq!(on_release.revision, release);
        assert_eq!(on_release.data.get(BRANCH_KEY).map(String::as_str), Some("release"));
    }

    #[test]
    fn reports_modified_and_deleted_files() {
        let repo = TempGitRepo::new();
        repo.write_file("keep.txt", "v1");
        repo.write_file("gone.txt", "bye");
        repo.commit_all("first");
        repo.write_file("keep.txt", "v2");
        repo.remove_file("gone.txt");
        repo.commit_all("second");
        let work = TempDir::new().unwrap();

        let rev = GitPlugin::new()
            .latest_revision(&config(&repo.url()), work.path())
            .unwrap()
            .unwrap();

        let mut files: Vec<_> = rev
            .modified_files
            .unwrap()
            .into_iter()
            .map(|f| (f.file_name, f.action))
            .collect();
        files.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            files,
            vec![
                ("gone.txt".to_string(), ScmAction::Deleted),
                ("keep.txt".to_string(), ScmAction::Modified),
            ]
        );
    }

    #[test]
    fn missing_url_fails() {
        let work = TempDir::new().unwrap();
        let err = GitPlugin::new()
            .latest_revision(&ScmPropertyConfiguration::new(), work.path())
            .unwrap_err();
        assert!(err.downcast_ref::<GitPluginError>().is_some());
    }

    #[test]
    fn unreachable_url_fails() {
        let work = TempDir::new().unwrap();
        let missing = work.path().join("no-such-repo");
        let url = format!("file://{}", missing.display());

        let result = GitPlugin::new().latest_revision(&config(&url), &work.path().join("checkout"));
        assert!(result.is_err());
    }
}

mod latest_revisions_since {
    use super::*;

    #[test]
    fn lists_newer_revisions_newest_first() {
        let repo = TempGitRepo::new();
        repo.write_file("a.txt", "1");
        let first = repo.commit_all("first");
        repo.write_file("a.txt", "2");
        let second = repo.commit_all("second");
        repo.write_file("a.txt", "3");
        let third = repo.commit_all("third");
        let work = TempDir::new().unwrap();

        let revs = GitPlugin::new()
            .latest_revisions_since(&config(&repo.url()), work.path(), &previous(&first))
            .unwrap();

        assert_eq!(ids(&revs), vec![third.as_str(), second.as_str()]);
    }

    #[test]
    fn accepts_abbreviated_previous_id() {
        let repo = TempGitRepo::new();
        repo.write_file("a.txt", "1");
        let first = repo.commit_all("first");
        repo.write_file("a.txt", "2");
        let second = repo.commit_all("second");
        repo.write_file("a.txt", "3");
        let third = repo.commit_all("third");
        let work = TempDir::new().unwrap();

        let revs = GitPlugin::new()
            .latest_revisions_since(&config(&repo.url()), work.path(), &previous(&first[..7]))
            .unwrap();

        assert_eq!(ids(&revs), vec![third.as_str(), second.as_str()]);
    }

    #[test]
    fn up_to_date_gives_empty_list() {
        let repo = TempGitRepo::new();
        repo.write_file("a.txt", "1");
        let head = repo.commit_all("first");
        let work = TempDir::new().unwrap();

        let revs = GitPlugin::new()
            .latest_revisions_since(&config(&repo.url()), work.path(), &previous(&head))
            .unwrap();
        assert!(revs.is_empty());
    }

    #[test]
    fn unknown_previous_reports_tip_only() {
        let repo = TempGitRepo::new();
        repo.write_file("a.txt", "1");
        repo.commit_all("first");
        repo.write_file("a.txt", "2");
        let head = repo.commit_all("second");
        let work = TempDir::new().unwrap();

        let revs = GitPlugin::new()
            .latest_revisions_since(
                &config(&repo.url()),
                work.path(),
                &previous("0123456789abcdef0123456789abcdef01234567"),
            )
            .unwrap();
        assert_eq!(ids(&revs), vec![head.as_str()]);
    }

    #[test]
    fn empty_repository_gives_empty_list() {
        let repo = TempGitRepo::new();
        let work = TempDir::new().unwrap();

        let revs = GitPlugin::new()
            .latest_revisions_since(&config(&repo.url()), work.path(), &previous("abc"))
            .unwrap();
        assert!(revs.is_empty());
    }
}

mod remote {
    use super::*;

    fn file_url(path: &Path) -> String {
        format!("file://{}", path.display())
    }

    #[test]
    fn clones_into_working_dir_then_fetches() {
        let repo = TempGitRepo::new();
        repo.write_file("a.txt", "1");
        let first = repo.commit_all("first");
        let work = TempDir::new().unwrap();
        let checkout = work.path().join("material");
        let config = config(&file_url(repo.path()));
        let plugin = GitPlugin::new();

        let rev = plugin.latest_revision(&config, &checkout).unwrap().unwrap();
        assert_eq!(rev.revision, first);
        assert!(checkout.join(".git").is_dir());

        repo.write_file("a.txt", "2");
        let second = repo.commit_all("second");

        let revs = plugin.latest_revisions_since(&config, &checkout, &previous(&first)).unwrap();
        assert_eq!(ids(&revs), vec![second.as_str()]);
    }

    #[test]
    fn follows_url_change_for_existing_checkout() {
        let old = TempGitRepo::new();
        old.write_file("a.txt", "old");
        old.commit_all("old repository");
        let new = TempGitRepo::new();
        new.write_file("b.txt", "new");
        let new_head = new.commit_all("new repository");
        let work = TempDir::new().unwrap();
        let checkout = work.path().join("material");
        let plugin = GitPlugin::new();

        plugin.latest_revision(&config(&file_url(old.path())), &checkout).unwrap();
        let rev = plugin
            .latest_revision(&config(&file_url(new.path())), &checkout)
            .unwrap()
            .unwrap();

        assert_eq!(rev.revision, new_head);
        let cloned = git2::Repository::open(&checkout).unwrap();
        let new_url = file_url(new.path());
        assert_eq!(cloned.find_remote("origin").unwrap().url(), Some(new_url.as_str()));
    }
}
