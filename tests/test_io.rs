#[cfg(test)]
mod tests {
    use kasm::cli::io::{parse_fasta, read_batch, read_reference};
    use std::io::Write;
    use tempfile::NamedTempFile;

    /* --------------------------------------------------------------------- */
    /*  Reads files                                                          */
    /* --------------------------------------------------------------------- */

    #[test]
    fn reads_file_packs_into_records() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# two reads, one per strand").unwrap();
        writeln!(file, "1 0 AAAAAGGGGG IIIIIIIIII").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "2 1 AAAGGGGGCC IIIIIIIIII").unwrap();

        let batch = read_batch(file.path(), 10).unwrap();
        assert_eq!(batch.len(), 2 * 22);

        // First record: sample byte, strand byte, bases, quals
        assert_eq!(batch[0], 1);
        assert_eq!(batch[1], b'0');
        assert_eq!(&batch[2..12], b"AAAAAGGGGG");
        assert_eq!(&batch[12..22], b"IIIIIIIIII");

        // Second record
        assert_eq!(batch[22], 2);
        assert_eq!(batch[23], b'1');
        assert_eq!(&batch[24..34], b"AAAGGGGGCC");
    }

    #[test]
    fn malformed_reads_files_are_rejected() {
        // Wrong read length
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1 0 AAAA IIII").unwrap();
        assert!(read_batch(file.path(), 10).is_err());

        // Bad strand
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1 2 AAAAAGGGGG IIIIIIIIII").unwrap();
        assert!(read_batch(file.path(), 10).is_err());

        // Sample id out of range
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "9 0 AAAAAGGGGG IIIIIIIIII").unwrap();
        assert!(read_batch(file.path(), 10).is_err());

        // Missing field
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1 0 AAAAAGGGGG").unwrap();
        assert!(read_batch(file.path(), 10).is_err());
    }

    /* --------------------------------------------------------------------- */
    /*  Reference files                                                      */
    /* --------------------------------------------------------------------- */

    #[test]
    fn reference_loader_accepts_fasta_and_raw() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">chr17:1000-1040").unwrap();
        writeln!(file, "ACGTACGTAC").unwrap();
        writeln!(file, "TTTTGGGGCC").unwrap();
        assert_eq!(
            read_reference(file.path()).unwrap(),
            b"ACGTACGTACTTTTGGGGCC"
        );

        let mut raw = NamedTempFile::new().unwrap();
        writeln!(raw, "ACGTACGT").unwrap();
        assert_eq!(read_reference(raw.path()).unwrap(), b"ACGTACGT");

        let empty = NamedTempFile::new().unwrap();
        assert!(read_reference(empty.path()).is_err());
    }

    /* --------------------------------------------------------------------- */
    /*  FASTA round trip                                                     */
    /* --------------------------------------------------------------------- */

    #[test]
    fn contig_text_parses_back_into_records() {
        let text = ">p_0_0.000000\nAAAAAGGGGGCC\n>p_1_-0.301030\nTTTT\nGGGG\n";
        let records = parse_fasta(text);
        assert_eq!(
            records,
            vec![
                ("p_0_0.000000".to_string(), "AAAAAGGGGGCC".to_string()),
                ("p_1_-0.301030".to_string(), "TTTTGGGG".to_string()),
            ]
        );
        assert!(parse_fasta("").is_empty());
    }
}
