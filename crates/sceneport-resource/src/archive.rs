use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use crate::cache::ResourceError;
use crate::key::ResourceKey;

/// Reads one entry out of a zip archive. Entry names are matched exactly
/// first, then case-insensitively; exported scenes frequently reference
/// `Textures/Wood.PNG` while the archive carries `textures/wood.png`.
pub(crate) fn read_entry(
    key: &ResourceKey,
    archive: &Path,
    entry: &str,
) -> Result<Arc<[u8]>, ResourceError> {
    let file = match fs::File::open(archive) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ResourceError::NotFound {
                key: key.to_string(),
            });
        }
        Err(err) => {
            return Err(ResourceError::Io {
                key: key.to_string(),
                message: err.to_string(),
            });
        }
    };

    let mut zip =
        zip::ZipArchive::new(BufReader::new(file)).map_err(|err| ResourceError::Archive {
            key: key.to_string(),
            message: err.to_string(),
        })?;

    let name = match zip.index_for_name(entry) {
        Some(_) => entry.to_owned(),
        None => {
            let lowered = entry.to_ascii_lowercase();
            match zip
                .file_names()
                .find(|name| name.to_ascii_lowercase() == lowered)
            {
                Some(name) => name.to_owned(),
                None => {
                    return Err(ResourceError::NotFound {
                        key: key.to_string(),
                    });
                }
            }
        }
    };

    let mut member = zip.by_name(&name).map_err(|err| ResourceError::Archive {
        key: key.to_string(),
        message: err.to_string(),
    })?;

    let mut data = Vec::with_capacity(member.size() as usize);
    member
        .read_to_end(&mut data)
        .map_err(|err| ResourceError::Archive {
            key: key.to_string(),
            message: err.to_string(),
        })?;

    Ok(data.into())
}
