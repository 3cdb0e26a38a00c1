//! Sound assets loaded once at startup

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::info;

use crate::{
    error::{Result, TimerError},
    state::Cue,
};

/// File name each cue is read from inside the sounds directory
pub fn file_name(cue: Cue) -> &'static str {
    match cue {
        Cue::Knock1 => "knock1.wav",
        Cue::Knock2 => "knock2.wav",
        Cue::Bell => "bell.wav",
    }
}

/// Raw sample bytes for every cue
#[derive(Debug, Clone)]
pub struct SoundBank {
    knock1: Arc<[u8]>,
    knock2: Arc<[u8]>,
    bell: Arc<[u8]>,
}

impl SoundBank {
    pub fn from_bytes(knock1: Vec<u8>, knock2: Vec<u8>, bell: Vec<u8>) -> Self {
        Self {
            knock1: knock1.into(),
            knock2: knock2.into(),
            bell: bell.into(),
        }
    }

    /// Read all three sounds from `dir`. Any missing or empty file fails the load.
    pub async fn load(dir: &Path) -> Result<Self> {
        let knock1 = read_asset(dir, Cue::Knock1).await?;
        let knock2 = read_asset(dir, Cue::Knock2).await?;
        let bell = read_asset(dir, Cue::Bell).await?;
        Ok(Self::from_bytes(knock1, knock2, bell))
    }

    pub fn samples(&self, cue: Cue) -> Arc<[u8]> {
        match cue {
            Cue::Knock1 => Arc::clone(&self.knock1),
            Cue::Knock2 => Arc::clone(&self.knock2),
            Cue::Bell => Arc::clone(&self.bell),
        }
    }
}

async fn read_asset(dir: &Path, cue: Cue) -> Result<Vec<u8>> {
    let path: PathBuf = dir.join(file_name(cue));
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| TimerError::AssetLoad {
            cue,
            path: path.clone(),
            source,
        })?;

    if bytes.is_empty() {
        return Err(TimerError::EmptyAsset { cue, path });
    }

    info!("Loaded {} sound ({} bytes) from {}", cue, bytes.len(), path.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("debate-timer-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn loads_all_three_sounds() {
        let dir = scratch_dir("assets-ok");
        for cue in Cue::ALL {
            std::fs::write(dir.join(file_name(cue)), cue.key().as_bytes()).unwrap();
        }

        let bank = SoundBank::load(&dir).await.unwrap();
        assert_eq!(&*bank.samples(Cue::Knock2), b"knock-2");
        assert_eq!(&*bank.samples(Cue::Bell), b"bell");

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn missing_sound_is_an_asset_error() {
        let dir = scratch_dir("assets-missing");
        std::fs::write(dir.join("knock1.wav"), b"x").unwrap();
        std::fs::write(dir.join("knock2.wav"), b"x").unwrap();
        std::fs::remove_file(dir.join("bell.wav")).ok();

        let err = SoundBank::load(&dir).await.unwrap_err();
        assert!(matches!(err, TimerError::AssetLoad { cue: Cue::Bell, .. }));

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn empty_sound_is_rejected() {
        let dir = scratch_dir("assets-empty");
        std::fs::write(dir.join("knock1.wav"), b"").unwrap();

        let err = SoundBank::load(&dir).await.unwrap_err();
        assert!(matches!(err, TimerError::EmptyAsset { cue: Cue::Knock1, .. }));

        std::fs::remove_dir_all(dir).ok();
    }
}
