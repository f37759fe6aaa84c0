use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::session::Session;
use crate::util::generate_id;

static SEED_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/seed");

/// A sessions file holds either one session or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum SessionFile {
    Many(Vec<Session>),
    One(Session),
}

impl SessionFile {
    fn into_sessions(self) -> Vec<Session> {
        match self {
            SessionFile::Many(sessions) => sessions,
            SessionFile::One(session) => vec![session],
        }
    }
}

/// The sessions shipped with the binary, in file-name order.
pub fn predefined_sessions() -> Vec<Session> {
    let mut files: Vec<_> = SEED_DIR
        .files()
        .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort_by(|a, b| a.path().cmp(b.path()));

    files
        .into_iter()
        .filter_map(|file| {
            let parsed = file
                .contents_utf8()
                .map(serde_json::from_str::<Session>);
            match parsed {
                Some(Ok(session)) => Some(session),
                Some(Err(e)) => {
                    tracing::warn!(path = %file.path().display(), "skipping bad seed session: {e}");
                    None
                }
                None => None,
            }
        })
        .collect()
}

/// Read extra sessions from a user supplied JSON file. The file is never written back.
pub fn load_sessions_file<P: AsRef<Path>>(path: P) -> Result<Vec<Session>, AppError> {
    let bytes = fs::read(path.as_ref())?;
    let file: SessionFile = serde_json::from_slice(&bytes)?;
    let mut sessions = file
        .into_sessions()
        .into_iter()
        .map(Session::sanitized)
        .collect::<Result<Vec<_>, _>>()?;

    // session ids stay unique across built-in and loaded sessions
    let mut taken: HashSet<String> = predefined_sessions().into_iter().map(|s| s.id).collect();
    for session in &mut sessions {
        if session.id.trim().is_empty() || !taken.insert(session.id.clone()) {
            tracing::debug!(session = %session.name, id = %session.id, "reassigning clashing session id");
            session.id = generate_id();
            taken.insert(session.id.clone());
        }
    }

    tracing::info!(
        path = %path.as_ref().display(),
        count = sessions.len(),
        "loaded sessions file"
    );
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn predefined_sessions_are_embedded() {
        let sessions = predefined_sessions();
        assert_eq!(sessions.len(), 2);

        let hiit = &sessions[0];
        assert_eq!(hiit.id, "hiit-gonzalo");
        assert_eq!(hiit.segment_count(), 21);
        assert_eq!(hiit.total_duration(), 2340);
        assert_eq!(hiit.segments[7].incline, 15.0);

        let walk = &sessions[1];
        assert_eq!(walk.id, "basic-walk");
        assert_eq!(walk.segment_count(), 5);
        assert_eq!(walk.total_duration(), 1500);
    }

    #[test]
    fn predefined_sessions_are_runnable() {
        for session in predefined_sessions() {
            assert!(session.validate_for_run().is_ok(), "{}", session.name);
        }
    }

    #[test]
    fn load_list_of_sessions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        fs::write(
            &path,
            r#"[{"id":"a","name":"A","segments":[{"id":"1","duration":60,"speed":20.0,"incline":3.0}]}]"#,
        )
        .unwrap();

        let sessions = load_sessions_file(&path).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].segments[0].speed, 15.0);
    }

    #[test]
    fn load_single_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.json");
        fs::write(
            &path,
            r#"{"id":"b","name":"B","segments":[{"id":"1","duration":30,"speed":4.0,"incline":1.0}]}"#,
        )
        .unwrap();

        let sessions = load_sessions_file(&path).unwrap();
        assert_eq!(sessions[0].name, "B");
    }

    #[test]
    fn load_makes_ids_unique() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dups.json");
        fs::write(
            &path,
            r#"[
                {"id":"x","name":"One","segments":[
                    {"id":"1","duration":60,"speed":4.0,"incline":1.0},
                    {"id":"1","duration":120,"speed":4.0,"incline":1.0}
                ]},
                {"id":"x","name":"Two","segments":[{"id":"1","duration":30,"speed":4.0,"incline":1.0}]},
                {"id":"basic-walk","name":"Three","segments":[{"id":"","duration":30,"speed":4.0,"incline":1.0}]}
            ]"#,
        )
        .unwrap();

        let mut sessions = load_sessions_file(&path).unwrap();
        let session_ids: HashSet<_> = sessions.iter().map(|s| s.id.clone()).collect();
        assert_eq!(session_ids.len(), 3);
        assert_eq!(sessions[0].id, "x");
        assert_ne!(sessions[2].id, "basic-walk");
        assert!(!sessions[2].segments[0].id.is_empty());

        let first = &mut sessions[0];
        assert_ne!(first.segments[0].id, first.segments[1].id);
        let id = first.segments[0].id.clone();
        first.remove_segment(&id);
        assert_eq!(first.segment_count(), 1);
        assert_eq!(first.segments[0].duration, 120);
    }

    #[test]
    fn load_rejects_empty_segments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, r#"[{"id":"c","name":"Empty","segments":[]}]"#).unwrap();

        assert_matches!(
            load_sessions_file(&path),
            Err(AppError::Session(SessionError::NoSegments { name })) if name == "Empty"
        );
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = tempdir().unwrap();
        assert_matches!(
            load_sessions_file(dir.path().join("missing.json")),
            Err(AppError::Io(_))
        );

        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();
        assert_matches!(load_sessions_file(&path), Err(AppError::Json(_)));
    }
}
