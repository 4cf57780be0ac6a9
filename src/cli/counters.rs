/// Per-region outcome tallies, merged across worker threads for the
/// end-of-run summary.
#[derive(Debug, Default)]
pub struct RegionCounters {
    pub regions: u64,
    pub assembled: u64,
    pub empty: u64,
    pub repeats: u64,
    pub errors: u64,
    pub contigs: u64,
}

impl std::ops::AddAssign for RegionCounters {
    fn add_assign(&mut self, other: Self) {
        self.regions += other.regions;
        self.assembled += other.assembled;
        self.empty += other.empty;
        self.repeats += other.repeats;
        self.errors += other.errors;
        self.contigs += other.contigs;
    }
}
