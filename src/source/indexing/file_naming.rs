use std::path::Path;

use crate::constants::articles::FILENAME_DELIMITER;
use crate::data::FileProvenance;
use crate::errors::AtlasError;
use crate::types::{CountryLabel, YearLabel};
use crate::utils::{find_year_token, normalize_inline_whitespace, title_case};

/// Derive the country label from the leading delimiter-separated token of a file stem.
///
/// `kenya_2021.csv` and `kenya_articles_2021.csv` both yield `Kenya`.
pub fn country_from_path(path: &Path) -> Result<CountryLabel, AtlasError> {
    let stem = file_stem(path)?;
    let token = stem.split(FILENAME_DELIMITER).next().unwrap_or(stem);
    let label = title_case(&normalize_inline_whitespace(token));
    if label.is_empty() {
        return Err(AtlasError::fatal_input(
            path,
            "file name has no leading country token",
        ));
    }
    Ok(label)
}

/// Derive the year label from a file stem, falling back to the parent directory name.
///
/// The first run of exactly four digits in the stem wins; otherwise the
/// immediate parent directory name is returned verbatim (it may not be numeric).
pub fn year_from_path(path: &Path) -> Result<YearLabel, AtlasError> {
    let stem = file_stem(path)?;
    if let Some(year) = find_year_token(stem) {
        return Ok(year.to_string());
    }
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| {
            AtlasError::fatal_input(path, "no year in file name and no parent directory")
        })
}

/// Build the shared provenance for every row of `path`.
pub fn provenance_for(path: &Path) -> Result<FileProvenance, AtlasError> {
    Ok(FileProvenance {
        path: path.to_path_buf(),
        country: country_from_path(path)?,
        year: year_from_path(path)?,
    })
}

fn file_stem(path: &Path) -> Result<&str, AtlasError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| AtlasError::fatal_input(path, "path has no valid file stem"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_comes_from_leading_token() {
        assert_eq!(
            country_from_path(Path::new("root/kenya_2021.csv")).unwrap(),
            "Kenya"
        );
        assert_eq!(
            country_from_path(Path::new("root/south sudan_media_2022.csv")).unwrap(),
            "South Sudan"
        );
        assert_eq!(
            country_from_path(Path::new("root/GHANA.csv")).unwrap(),
            "Ghana"
        );
    }

    #[test]
    fn empty_country_token_is_fatal() {
        let err = country_from_path(Path::new("root/_2021.csv")).unwrap_err();
        assert!(matches!(err, AtlasError::FatalInput { .. }));
    }

    #[test]
    fn year_prefers_file_name_token() {
        assert_eq!(
            year_from_path(Path::new("root/2020/kenya_2021.csv")).unwrap(),
            "2021"
        );
        assert_eq!(
            year_from_path(Path::new("root/kenya-climate-2023-export.csv")).unwrap(),
            "2023"
        );
    }

    #[test]
    fn year_falls_back_to_parent_directory() {
        assert_eq!(
            year_from_path(Path::new("root/2024/kenya_all.csv")).unwrap(),
            "2024"
        );
        assert_eq!(
            year_from_path(Path::new("root/Articles 2022/kenya.csv")).unwrap(),
            "Articles 2022"
        );
    }

    #[test]
    fn provenance_combines_country_and_year() {
        let provenance = provenance_for(Path::new("root/2021/nigeria_2021.csv")).unwrap();
        assert_eq!(provenance.country, "Nigeria");
        assert_eq!(provenance.year, "2021");
        assert_eq!(provenance.path, Path::new("root/2021/nigeria_2021.csv"));
    }
}
