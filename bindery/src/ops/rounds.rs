//! Turning round files into a session of rounds.

use std::path::PathBuf;

use bindery_model::{Round, Session};
use tracing::debug;

/// Load each file as one round, in order. The last file is the final round.
pub fn load_rounds(paths: &[PathBuf]) -> bindery_manifest::Result<Vec<Round>> {
    let mut session = Session::new();
    let mut rounds = Vec::with_capacity(paths.len());

    for (index, path) in paths.iter().enumerate() {
        let file = bindery_manifest::parse_file(path)?;
        debug!(path = %path.display(), elements = file.elements.len(), "loaded round file");
        rounds.push(session.round(file.elements, index + 1 == paths.len()));
    }

    Ok(rounds)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use bindery_model::RoundEnv;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_last_file_is_final_round() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("1.toml");
        let second = temp.path().join("2.toml");
        fs::write(
            &first,
            r#"
            [[elements]]
            name = "com.example.User"
            kind = "class"
            "#,
        )
        .unwrap();
        fs::write(&second, "").unwrap();

        let rounds = load_rounds(&[first, second]).unwrap();

        assert_eq!(rounds.len(), 2);
        assert!(!rounds[0].is_last());
        assert!(rounds[1].is_last());
        assert!(rounds[1].root_elements().is_empty());
        assert!(rounds[1].lookup("com.example.User").is_some());
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_rounds(&[temp.path().join("absent.toml")]).unwrap_err();
        assert!(matches!(*err, bindery_manifest::Error::Io { .. }));
    }
}
