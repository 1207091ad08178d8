//! Unit tests for the metadata join and default filling

#[cfg(test)]
mod tests {
    use handover_index::services::merge::{
        MetadataIndex, fill_document_number, fill_extension, merge_metadata,
    };
    use handover_index::{
        Category, DirEntry, Error, MergedRow, MetadataColumns, MetadataTable, RootLabel,
    };
    use std::path::PathBuf;

    fn file(name: &str) -> DirEntry {
        DirEntry {
            path: PathBuf::from("/handover").join(name),
            depth: 2,
            name: RootLabel::Named(name.to_string()),
            category: Category::File,
            folder: RootLabel::Named("handover".to_string()),
            relative_path: RootLabel::Named(name.to_string()),
            link_segments: vec![name.to_string()],
        }
    }

    fn folder(name: &str) -> DirEntry {
        DirEntry {
            category: Category::Folder,
            folder: RootLabel::Named(name.to_string()),
            ..file(name)
        }
    }

    fn table(columns: &[&str], rows: &[&[Option<&str>]]) -> MetadataTable {
        MetadataTable {
            columns: columns.iter().map(ToString::to_string).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|v| v.map(ToString::to_string)).collect())
                .collect(),
        }
    }

    fn standard_table() -> MetadataTable {
        table(
            &["Document No", "File Name", "File", "Title"],
            &[&[Some("DOC-1"), Some("a.txt"), None, Some("Report A")]],
        )
    }

    fn unmatched(entry: DirEntry) -> MergedRow {
        MergedRow {
            entry,
            document_number: None,
            extension: None,
            extra: Vec::new(),
            matched: false,
        }
    }

    #[test]
    fn test_matched_file_takes_metadata_identifier() {
        let metadata = standard_table();
        let index = MetadataIndex::build(&metadata, &MetadataColumns::default()).unwrap();

        let rows = merge_metadata(&[file("a.txt"), file("b.txt")], &index);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].document_number.as_deref(), Some("DOC-1"));
        assert!(rows[0].matched);
        assert_eq!(rows[0].extra, vec![Some("Report A".to_string())]);
        assert_eq!(rows[1].document_number.as_deref(), Some("b"));
        assert!(!rows[1].matched);
        assert_eq!(rows[1].extra, vec![None]);
    }

    #[test]
    fn test_extension_is_back_filled_only_when_missing() {
        let metadata = table(
            &["Document No", "File Name", "File"],
            &[&[Some("DWG-1"), Some("GA.pdf"), Some("PDF")]],
        );
        let index = MetadataIndex::build(&metadata, &MetadataColumns::default()).unwrap();

        let rows = merge_metadata(&[file("GA.pdf"), file("notes.docx")], &index);

        assert_eq!(rows[0].extension.as_deref(), Some("PDF"));
        assert_eq!(rows[1].extension.as_deref(), Some("docx"));
    }

    #[test]
    fn test_folders_never_receive_defaults() {
        let metadata = standard_table();
        let index = MetadataIndex::build(&metadata, &MetadataColumns::default()).unwrap();

        let rows = merge_metadata(&[folder("Reports.old")], &index);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].document_number, None);
        assert_eq!(rows[0].extension, None);
    }

    #[test]
    fn test_duplicate_metadata_keys_duplicate_rows() {
        let metadata = table(
            &["Document No", "File Name", "File"],
            &[
                &[Some("DOC-1"), Some("a.txt"), None],
                &[Some("DOC-2"), Some("a.txt"), None],
            ],
        );
        let index = MetadataIndex::build(&metadata, &MetadataColumns::default()).unwrap();

        let rows = merge_metadata(&[file("a.txt")], &index);

        let numbers: Vec<_> = rows.iter().map(|r| r.document_number.as_deref()).collect();
        assert_eq!(numbers, vec![Some("DOC-1"), Some("DOC-2")]);
    }

    #[test]
    fn test_matched_row_without_identifier_gets_default() {
        let metadata = table(
            &["Document No", "File Name", "File"],
            &[&[None, Some("manual.docx"), None]],
        );
        let index = MetadataIndex::build(&metadata, &MetadataColumns::default()).unwrap();

        let rows = merge_metadata(&[file("manual.docx")], &index);

        assert!(rows[0].matched);
        assert_eq!(rows[0].document_number.as_deref(), Some("manual"));
    }

    #[test]
    fn test_missing_columns_are_all_listed() {
        let metadata = table(&["File Name", "Title"], &[]);

        let err = MetadataIndex::build(&metadata, &MetadataColumns::default()).unwrap_err();

        match err {
            Error::MissingColumns(missing) => {
                assert_eq!(missing, vec!["Document No".to_string(), "File".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other}"),
        }
    }

    #[test]
    fn test_fill_functions_leave_existing_values() {
        let mut row = unmatched(file("manual.docx"));
        row.document_number = Some("KEEP".to_string());
        row.extension = Some("DOCX".to_string());

        let row = fill_extension(fill_document_number(row));

        assert_eq!(row.document_number.as_deref(), Some("KEEP"));
        assert_eq!(row.extension.as_deref(), Some("DOCX"));
    }

    #[test]
    fn test_fill_functions_derive_from_name() {
        let row = fill_extension(fill_document_number(unmatched(file("manual.docx"))));

        assert_eq!(row.document_number.as_deref(), Some("manual"));
        assert_eq!(row.extension.as_deref(), Some("docx"));
    }

    #[test]
    fn test_drive_relative_root_never_matches() {
        let metadata = standard_table();
        let index = MetadataIndex::build(&metadata, &MetadataColumns::default()).unwrap();
        let root = DirEntry {
            name: RootLabel::DriveRelative,
            folder: RootLabel::DriveRelative,
            relative_path: RootLabel::DriveRelative,
            link_segments: Vec::new(),
            depth: 1,
            ..folder("unused")
        };

        let rows = merge_metadata(&[root], &index);

        assert_eq!(rows.len(), 1);
        assert!(!rows[0].matched);
        assert_eq!(rows[0].document_number, None);
    }
}
