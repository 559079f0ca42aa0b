use std::fs::{self, File};
use std::io::Write;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use filetime::FileTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Serialized POSIX stat, as stashed inside a placeholder file and as returned
/// by `getattributes`. Field names match the `st_*` members adapters expect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatDict {
    pub st_mode: u32,
    pub st_uid: u32,
    pub st_gid: u32,
    pub st_size: u64,
    pub st_atime: i64,
    pub st_mtime: i64,
    pub st_ctime: i64,
}

/// Build a [`StatDict`] from whatever is currently on disk at `path`.
pub fn stat_dict_for(path: &Path) -> Result<StatDict> {
    let meta = fs::metadata(path)?;
    Ok(StatDict {
        st_mode: meta.mode(),
        st_uid: meta.uid(),
        st_gid: meta.gid(),
        st_size: meta.size(),
        st_atime: meta.atime(),
        st_mtime: meta.mtime(),
        st_ctime: meta.ctime(),
    })
}

/// Read the stat dictionary serialized inside a placeholder file.
pub fn read_stat_dict(placeholder_path: &Path) -> Result<StatDict> {
    let contents = fs::read(placeholder_path)?;
    let stat = serde_json::from_slice(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(stat)
}

/// Serialize `stat` into `placeholder_path`, without letting the write itself
/// bump the file's own atime/mtime away from what a rename-into-place just gave
/// it. `std::fs::File` has no O_NOATIME-style flag for this, so we record the
/// times first and restore them with an explicit `utimes` call afterwards.
pub fn write_stat_dict_without_touching_times(placeholder_path: &Path, stat: &StatDict) -> Result<()> {
    let before = fs::metadata(placeholder_path)?;
    let atime = FileTime::from_last_access_time(&before);
    let mtime = FileTime::from_last_modification_time(&before);

    let mut file = File::create(placeholder_path)?;
    let json = serde_json::to_vec(stat)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    file.write_all(&json)?;
    file.sync_data()?;
    drop(file);

    filetime::set_file_times(placeholder_path, atime, mtime)?;
    Ok(())
}

/// Restore atime/mtime on a just-hydrated resident file from its placeholder's
/// stat dictionary.
pub fn restore_times_from_stat(cache_path: &Path, stat: &StatDict) -> Result<()> {
    let atime = FileTime::from_unix_time(stat.st_atime, 0);
    let mtime = FileTime::from_unix_time(stat.st_mtime, 0);
    filetime::set_file_times(cache_path, atime, mtime)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn stat_dict_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"hello").unwrap();
        drop(f);

        let stat = stat_dict_for(&path).unwrap();
        assert_eq!(stat.st_size, 5);

        let placeholder = dir.path().join("f.placeholder");
        fs::write(&placeholder, b"stale").unwrap();
        write_stat_dict_without_touching_times(&placeholder, &stat).unwrap();

        let read_back = read_stat_dict(&placeholder).unwrap();
        assert_eq!(read_back.st_size, stat.st_size);
        assert_eq!(read_back.st_mtime, stat.st_mtime);
    }
}
