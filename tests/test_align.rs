#[cfg(test)]
mod tests {
    use kasm::kasm::align::{align, Scoring, MAX_QUERY_LEN, MAX_REF_LEN};

    fn default_scoring() -> Scoring {
        Scoring::default()
    }

    /* --------------------------------------------------------------------- */
    /*  Identity and mismatch                                                */
    /* --------------------------------------------------------------------- */

    #[test]
    fn identical_sequences_align_end_to_end() {
        let scoring = default_scoring();
        let aln = align(b"ACGTACGTAC", b"ACGTACGTAC", &scoring).unwrap();

        assert_eq!(aln.best_score, 10 * scoring.match_score);
        assert!(aln.second_best_score < aln.best_score);
        assert_eq!(aln.ref_start, 1);
        assert_eq!(aln.ref_end, 10);
        assert_eq!(aln.cigar, "10M");
    }

    #[test]
    fn single_mismatch_stays_diagonal() {
        let scoring = default_scoring();
        let aln = align(b"ACGA", b"ACGT", &scoring).unwrap();

        assert_eq!(
            aln.best_score,
            3 * scoring.match_score + scoring.mismatch_penalty
        );
        assert_eq!(aln.cigar, "4M");
        assert_eq!(aln.ref_start, 1);
        assert_eq!(aln.ref_end, 4);
    }

    /* --------------------------------------------------------------------- */
    /*  Semi-global placement                                                */
    /* --------------------------------------------------------------------- */

    #[test]
    fn query_finds_its_window_in_the_reference() {
        let scoring = default_scoring();
        let aln = align(b"ACGT", b"TTACGTTT", &scoring).unwrap();

        assert_eq!(aln.best_score, 32);
        assert!(aln.second_best_score < 32);
        assert_eq!(aln.ref_start, 3);
        assert_eq!(aln.ref_end, 6);
        assert_eq!(aln.cigar, "4M");
    }

    #[test]
    fn display_renders_colon_separated_fields() {
        let scoring = default_scoring();
        let aln = align(b"ACGT", b"TTACGTTT", &scoring).unwrap();
        let rendered = aln.to_string();
        assert!(rendered.starts_with("32:"));
        assert!(rendered.ends_with(":3:6:4M"));
    }

    /* --------------------------------------------------------------------- */
    /*  Affine gaps                                                          */
    /* --------------------------------------------------------------------- */

    #[test]
    fn insertion_run_pays_open_once() {
        let scoring = default_scoring();
        // AAA inserted between the matching flanks ACGT / TGCA
        let aln = align(b"ACGTAAATGCA", b"ACGTTGCA", &scoring).unwrap();

        let expected =
            8 * scoring.match_score + scoring.gap_open + 2 * scoring.gap_extend;
        assert_eq!(aln.best_score, expected);
        assert_eq!(aln.cigar, "4M3I4M");
        assert_eq!(aln.ref_start, 1);
        assert_eq!(aln.ref_end, 8);
    }

    #[test]
    fn deletion_run_pays_open_once() {
        let scoring = default_scoring();
        let aln = align(b"ACGTTGCA", b"ACGTAAATGCA", &scoring).unwrap();

        let expected =
            8 * scoring.match_score + scoring.gap_open + 2 * scoring.gap_extend;
        assert_eq!(aln.best_score, expected);
        assert_eq!(aln.cigar, "4M3D4M");
        assert_eq!(aln.ref_start, 1);
        assert_eq!(aln.ref_end, 11);
    }

    #[test]
    fn custom_scoring_parameters_are_honored() {
        let scoring = Scoring {
            match_score: 2,
            mismatch_penalty: -3,
            gap_open: -5,
            gap_extend: -1,
        };
        let aln = align(b"ACGTACGT", b"ACGTACGT", &scoring).unwrap();
        assert_eq!(aln.best_score, 16);
        assert_eq!(aln.cigar, "8M");
    }

    /* --------------------------------------------------------------------- */
    /*  Bounds                                                               */
    /* --------------------------------------------------------------------- */

    #[test]
    fn oversized_inputs_are_rejected() {
        let scoring = default_scoring();

        let long_query = vec![b'A'; MAX_QUERY_LEN + 1];
        assert!(align(&long_query, b"ACGT", &scoring).is_err());

        let long_ref = vec![b'A'; MAX_REF_LEN + 1];
        assert!(align(b"ACGT", &long_ref, &scoring).is_err());

        assert!(align(b"", b"ACGT", &scoring).is_err());
        assert!(align(b"ACGT", b"", &scoring).is_err());
    }

    #[test]
    fn long_homopolymer_alignment_is_stable() {
        let scoring = default_scoring();
        let query = vec![b'A'; 200];
        let reference = vec![b'A'; 500];
        let aln = align(&query, &reference, &scoring).unwrap();
        assert_eq!(aln.best_score, 200 * scoring.match_score);
        assert_eq!(aln.cigar, "200M");
    }
}
