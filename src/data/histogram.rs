//! Fixed-width histogram over house values.
//!
//! Bins are half-open `[lo, hi)` except the last, which also holds the
//! maximum. Degenerate inputs follow the usual plotting convention: no values
//! bins over `[0, 1]`, identical values bin over `[v - 0.5, v + 0.5]`.

/// Bin count used by the value-distribution chart.
pub const DEFAULT_BINS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<Bin>,
}

impl Histogram {
    /// Partition the range of `values` into `bins` equal-width bins.
    ///
    /// `bins == 0` is treated as a single bin.
    pub fn compute(values: impl IntoIterator<Item = f64>, bins: usize) -> Self {
        let n = bins.max(1);
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();

        let (mut lo, mut hi) = match values.first() {
            None => (0.0, 1.0),
            Some(&first) => values
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        };
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / n as f64;
        let edge = |i: usize| if i == n { hi } else { lo + width * i as f64 };
        let mut counts = vec![0usize; n];

        for v in values {
            let mut i = (((v - lo) / width) as usize).min(n - 1);
            // Float error can push a value one bin off its edges.
            if i > 0 && v < edge(i) {
                i -= 1;
            } else if i + 1 < n && v >= edge(i + 1) {
                i += 1;
            }
            counts[i] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                lo: edge(i),
                hi: edge(i + 1),
                count,
            })
            .collect();
        Histogram { bins }
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Total number of binned values.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// `(lo, hi)` of the binned range.
    pub fn range(&self) -> (f64, f64) {
        match (self.bins.first(), self.bins.last()) {
            (Some(first), Some(last)) => (first.lo, last.hi),
            _ => (0.0, 1.0),
        }
    }

    pub fn bin_width(&self) -> f64 {
        self.bins.first().map(Bin::width).unwrap_or(0.0)
    }
}
