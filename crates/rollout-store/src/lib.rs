pub mod action;
pub mod config;
pub mod console;
pub mod persist;
pub mod reducers;

pub use action::Action;
pub use config::ConsoleConfig;
pub use console::Console;
pub use reducers::reduce;

#[cfg(test)]
pub(crate) mod test_support {
    use rollout_core::{Release, Revision};
    use time::OffsetDateTime;

    pub fn rev(id: u64, archs: &[&str]) -> Revision {
        Revision {
            revision: id,
            version: format!("1.{id}"),
            architectures: archs.iter().map(|a| a.to_string()).collect(),
            channels: Vec::new(),
            confinement: "strict".into(),
            grade: "stable".into(),
            attributes: Default::default(),
            created_at: None,
        }
    }

    pub fn release(revision: Option<u64>, track: &str, risk: &str, arch: &str, secs: i64) -> Release {
        Release {
            revision,
            architecture: arch.into(),
            track: track.into(),
            risk: risk.into(),
            branch: None,
            when: OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(secs),
            expiration_date: None,
            is_progressive: false,
            progressive: None,
        }
    }
}
