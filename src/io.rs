//! Graph/seed file readers (A1, §4.10 / §6).

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::graph::{Edge, Graph, SeedSet};
use crate::Error;

/// parses `V E` then `E` lines of `u v p pB`; `u,v < V` and `0 <= p <= pB <= 1`.
pub fn read_graph(path: impl AsRef<Path>) -> Result<Graph, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Input(format!("cannot read graph file {}: {e}", path.display())))?;
    let mut tokens = text.split_ascii_whitespace();

    let n = next_uint(&mut tokens, "V")?;
    let m = next_uint(&mut tokens, "E")?;

    let mut edges = Vec::with_capacity(m);
    for i in 0..m {
        let from = next_uint(&mut tokens, "u")?;
        let to = next_uint(&mut tokens, "v")?;
        let p = next_float(&mut tokens, "p")?;
        let pb = next_float(&mut tokens, "pB")?;

        if from >= n || to >= n {
            return Err(Error::Input(format!(
                "edge {i}: endpoint out of range ({from},{to}) for V={n}"
            )));
        }
        if !(0.0..=1.0).contains(&p) || !(0.0..=1.0).contains(&pb) || p > pb {
            return Err(Error::Input(format!(
                "edge {i}: probabilities must satisfy 0 <= p <= pB <= 1, got p={p}, pB={pb}"
            )));
        }
        edges.push(Edge { from, to, p, pb });
    }

    Ok(Graph::build(n, edges))
}

/// parses `Na` then Na indices, then `Nr` then Nr indices; `Sa ∩ Sr = ∅`.
pub fn read_seeds(path: impl AsRef<Path>, n: usize) -> Result<SeedSet, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Input(format!("cannot read seed file {}: {e}", path.display())))?;
    let mut tokens = text.split_ascii_whitespace();

    let na = next_uint(&mut tokens, "Na")?;
    let sa = read_indices(&mut tokens, na, n, "Sa")?;
    let nr = next_uint(&mut tokens, "Nr")?;
    let sr = read_indices(&mut tokens, nr, n, "Sr")?;

    let seen: HashSet<_> = sa.iter().collect();
    if sr.iter().any(|v| seen.contains(v)) {
        return Err(Error::Input("Sa and Sr must be disjoint".to_string()));
    }

    Ok(SeedSet::new(n, sa, sr))
}

fn read_indices<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    count: usize,
    n: usize,
    label: &str,
) -> Result<Vec<usize>, Error> {
    let mut indices = Vec::with_capacity(count);
    for _ in 0..count {
        let v = next_uint(tokens, label)?;
        if v >= n {
            return Err(Error::Input(format!("{label} index {v} out of range for V={n}")));
        }
        indices.push(v);
    }
    Ok(indices)
}

fn next_uint<'a>(tokens: &mut impl Iterator<Item = &'a str>, label: &str) -> Result<usize, Error> {
    tokens
        .next()
        .ok_or_else(|| Error::Input(format!("expected {label}, found end of input")))?
        .parse()
        .map_err(|_| Error::Input(format!("expected an unsigned integer for {label}")))
}

fn next_float<'a>(tokens: &mut impl Iterator<Item = &'a str>, label: &str) -> Result<f64, Error> {
    tokens
        .next()
        .ok_or_else(|| Error::Input(format!("expected {label}, found end of input")))?
        .parse()
        .map_err(|_| Error::Input(format!("expected a float for {label}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct TempPath(PathBuf);

    impl TempPath {
        fn new(contents: &str) -> Self {
            static COUNTER: AtomicU64 = AtomicU64::new(0);
            let id = COUNTER.fetch_add(1, Ordering::Relaxed);
            let mut path = std::env::temp_dir();
            path.push(format!("boostspread-io-test-{id}"));
            fs::File::create(&path).unwrap().write_all(contents.as_bytes()).unwrap();
            TempPath(path)
        }
    }

    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    impl AsRef<Path> for TempPath {
        fn as_ref(&self) -> &Path {
            &self.0
        }
    }

    fn write_temp(contents: &str) -> TempPath {
        TempPath::new(contents)
    }

    #[test]
    fn reads_a_well_formed_chain_graph() {
        let path = write_temp("5 4\n0 1 1.0 1.0\n1 2 1.0 1.0\n2 3 1.0 1.0\n3 4 1.0 1.0\n");
        let graph = read_graph(&path).unwrap();
        assert_eq!(graph.n(), 5);
        assert_eq!(graph.n_edges(), 4);
    }

    #[test]
    fn rejects_out_of_range_endpoint() {
        let path = write_temp("2 1\n0 5 1.0 1.0\n");
        assert!(matches!(read_graph(&path), Err(Error::Input(_))));
    }

    #[test]
    fn rejects_p_greater_than_pb() {
        let path = write_temp("2 1\n0 1 0.9 0.5\n");
        assert!(matches!(read_graph(&path), Err(Error::Input(_))));
    }

    #[test]
    fn reads_disjoint_seed_sets() {
        let path = write_temp("2\n0 1\n1\n3\n");
        let seeds = read_seeds(&path, 5).unwrap();
        assert_eq!(seeds.sa(), &[0, 1]);
        assert_eq!(seeds.sr(), &[3]);
    }

    #[test]
    fn rejects_overlapping_seed_sets() {
        let path = write_temp("1\n0\n1\n0\n");
        assert!(matches!(read_seeds(&path, 5), Err(Error::Input(_))));
    }
}
