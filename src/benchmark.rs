//! Drivers that time the avl tree against the red black tree and write the results as CSV.
//!
//! Two experiments are available:
//!
//! - `timings`: insert a shuffled permutation of `0..count`, search for every key in another
//!   shuffled order, then remove every key in a third shuffled order, timing each operation.
//! - `deletion`: for every tree size `n` in `start..=end`, build a tree from a shuffled
//!   `0..n` and time removing `delete_count` shuffled keys.
//!
//! Both engines receive identical key orders for a given seed.

use crate::avl_tree::AvlTree;
use crate::error::{Error, Result};
use crate::ordered_tree::OrderedTree;
use crate::red_black_tree::RedBlackTree;
use compare::{natural, Natural};
use log::{error, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

fn default_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}

fn parse<N>(value: &str, name: &str) -> Result<N>
where
    N: FromStr,
{
    value
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("invalid {}: {}", name, value)))
}

fn check_arity(expected: usize, args: &[String]) -> Result<()> {
    if args.len() > expected {
        return Err(Error::InvalidArgument(format!(
            "expected at most {} arguments, got {}",
            expected,
            args.len(),
        )));
    }
    Ok(())
}

fn elapsed_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Configuration of the `timings` experiment.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingConfig {
    /// Number of keys inserted, searched, and removed.
    pub count: usize,
    pub seed: u64,
    /// Output files are named `<prefix>_avl.csv` and `<prefix>_rbt.csv`.
    pub prefix: String,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            count: 1000,
            seed: default_seed(),
            prefix: String::from("exec_time"),
        }
    }
}

impl TimingConfig {
    /// Parses the positional arguments `[count] [seed] [prefix]`. Missing arguments keep
    /// their default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::benchmark::TimingConfig;
    ///
    /// let config = TimingConfig::from_args(&["500", "7"]).unwrap();
    /// assert_eq!(config.count, 500);
    /// assert_eq!(config.seed, 7);
    /// assert_eq!(config.prefix, "exec_time");
    ///
    /// assert!(TimingConfig::from_args(&["0"]).is_err());
    /// ```
    pub fn from_args<S>(args: &[S]) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let args: Vec<String> = args.iter().map(|arg| arg.as_ref().to_string()).collect();
        check_arity(3, &args)?;

        let mut config = TimingConfig::default();
        if let Some(count) = args.get(0) {
            config.count = parse(count, "item count")?;
        }
        if let Some(seed) = args.get(1) {
            config.seed = parse(seed, "seed")?;
        }
        if let Some(prefix) = args.get(2) {
            config.prefix = prefix.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::InvalidArgument(String::from(
                "item count must be greater than zero",
            )));
        }
        Ok(())
    }

    pub fn avl_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_avl.csv", self.prefix))
    }

    pub fn rbt_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_rbt.csv", self.prefix))
    }
}

/// Configuration of the `deletion` experiment.
#[derive(Clone, Debug, PartialEq)]
pub struct DeletionConfig {
    /// Smallest tree size measured.
    pub start: usize,
    /// Largest tree size measured, inclusive.
    pub end: usize,
    /// Number of keys removed from every tree.
    pub delete_count: usize,
    pub seed: u64,
    /// Output files are named `<prefix>avl_deletion_time.csv` and
    /// `<prefix>rbt_deletion_time.csv`.
    pub prefix: String,
}

impl Default for DeletionConfig {
    fn default() -> Self {
        DeletionConfig {
            start: 50,
            end: 1049,
            delete_count: 50,
            seed: default_seed(),
            prefix: String::new(),
        }
    }
}

impl DeletionConfig {
    /// Parses the positional arguments `[start] [end] [delete_count] [seed] [prefix]`. Missing
    /// arguments keep their default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::benchmark::DeletionConfig;
    ///
    /// let config = DeletionConfig::from_args(&["10", "20", "5"]).unwrap();
    /// assert_eq!((config.start, config.end, config.delete_count), (10, 20, 5));
    ///
    /// assert!(DeletionConfig::from_args(&["20", "10"]).is_err());
    /// ```
    pub fn from_args<S>(args: &[S]) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let args: Vec<String> = args.iter().map(|arg| arg.as_ref().to_string()).collect();
        check_arity(5, &args)?;

        let mut config = DeletionConfig::default();
        if let Some(start) = args.get(0) {
            config.start = parse(start, "start value")?;
        }
        if let Some(end) = args.get(1) {
            config.end = parse(end, "end value")?;
        }
        if let Some(delete_count) = args.get(2) {
            config.delete_count = parse(delete_count, "delete count")?;
        }
        if let Some(seed) = args.get(3) {
            config.seed = parse(seed, "seed")?;
        }
        if let Some(prefix) = args.get(4) {
            config.prefix = prefix.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(Error::InvalidArgument(String::from(
                "end value must be at least the start value",
            )));
        }
        if self.delete_count == 0 || self.delete_count > self.start {
            return Err(Error::InvalidArgument(format!(
                "delete count must be between 1 and the start value {}",
                self.start,
            )));
        }
        Ok(())
    }

    pub fn avl_path(&self) -> PathBuf {
        PathBuf::from(format!("{}avl_deletion_time.csv", self.prefix))
    }

    pub fn rbt_path(&self) -> PathBuf {
        PathBuf::from(format!("{}rbt_deletion_time.csv", self.prefix))
    }
}

/// Three independent shuffles of `0..count`.
#[derive(Clone, Debug)]
pub struct KeyOrders {
    pub insert: Vec<i32>,
    pub search: Vec<i32>,
    pub remove: Vec<i32>,
}

impl KeyOrders {
    pub fn shuffled(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let base: Vec<i32> = (0..count as i32).collect();
        let mut shuffle = || {
            let mut keys = base.clone();
            keys.shuffle(&mut rng);
            keys
        };
        let insert = shuffle();
        let search = shuffle();
        let remove = shuffle();
        KeyOrders {
            insert,
            search,
            remove,
        }
    }
}

/// Elapsed milliseconds of every single operation, in execution order.
#[derive(Clone, Debug, Default)]
pub struct OperationTimings {
    pub insert: Vec<f64>,
    pub search: Vec<f64>,
    pub remove: Vec<f64>,
}

/// Runs the insert, search, and remove passes of the `timings` experiment on an empty tree of
/// type `B`. A key that cannot be found or removed aborts the run with
/// `Error::BenchmarkFailure`.
pub fn collect_timings<B>(orders: &KeyOrders) -> Result<OperationTimings>
where
    B: OrderedTree<i32, Natural<i32>>,
{
    let mut tree = B::with_cmp(natural());
    let mut timings = OperationTimings::default();

    for (index, key) in orders.insert.iter().enumerate() {
        let start = Instant::now();
        if let Err(err) = tree.insert(*key) {
            error!("{} insert failed at index {}: {}", B::NAME, index, err);
            return Err(err);
        }
        timings.insert.push(elapsed_ms(start.elapsed()));
    }

    for key in &orders.search {
        let start = Instant::now();
        let found = tree.search(key).is_some();
        timings.search.push(elapsed_ms(start.elapsed()));
        if !found {
            return Err(Error::BenchmarkFailure(format!(
                "{} search missed key {}",
                B::NAME,
                key,
            )));
        }
    }

    for key in &orders.remove {
        let start = Instant::now();
        if tree.remove(key).is_none() {
            return Err(Error::BenchmarkFailure(format!(
                "{} removal failed for key {}",
                B::NAME,
                key,
            )));
        }
        timings.remove.push(elapsed_ms(start.elapsed()));
    }

    Ok(timings)
}

/// Writes one `label,elapsed_ms` row per operation: all insertions, then all searches, then
/// all removals.
pub fn write_timings<W>(mut writer: W, timings: &OperationTimings) -> Result<()>
where
    W: Write,
{
    let passes = [
        ("insert", &timings.insert),
        ("search", &timings.search),
        ("remove", &timings.remove),
    ];
    for (label, samples) in passes.iter() {
        for elapsed in samples.iter() {
            writeln!(writer, "{},{:.6}", label, elapsed)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Runs the `deletion` experiment on trees of type `B`, returning `(n, elapsed_ms)` for every
/// tree size.
pub fn deletion_sweep<B>(config: &DeletionConfig) -> Result<Vec<(usize, f64)>>
where
    B: OrderedTree<i32, Natural<i32>>,
{
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut samples = Vec::with_capacity(config.end - config.start + 1);

    for n in config.start..=config.end {
        let mut keys: Vec<i32> = (0..n as i32).collect();
        keys.shuffle(&mut rng);
        let mut tree = B::with_cmp(natural());
        for key in &keys {
            if let Err(err) = tree.insert(*key) {
                error!("{} insert failed while building tree of size {}: {}", B::NAME, n, err);
                return Err(err);
            }
        }

        keys.shuffle(&mut rng);
        let start = Instant::now();
        for key in &keys[..config.delete_count] {
            if tree.remove(key).is_none() {
                return Err(Error::BenchmarkFailure(format!(
                    "{} removal failed for key {} in tree size {}",
                    B::NAME,
                    key,
                    n,
                )));
            }
        }
        samples.push((n, elapsed_ms(start.elapsed())));
    }

    Ok(samples)
}

/// Writes one `n,elapsed_ms` row per tree size.
pub fn write_samples<W>(mut writer: W, samples: &[(usize, f64)]) -> Result<()>
where
    W: Write,
{
    for (n, elapsed) in samples {
        writeln!(writer, "{},{:.6}", n, elapsed)?;
    }
    writer.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    match File::create(path) {
        Ok(file) => Ok(BufWriter::new(file)),
        Err(err) => {
            error!("unable to open {} for writing", path.display());
            Err(Error::from(err))
        },
    }
}

/// Runs the `timings` experiment for both engines and writes both CSV files. Returns the
/// paths written, avl first.
pub fn run_timings(config: &TimingConfig) -> Result<Vec<PathBuf>> {
    config.validate()?;
    info!(
        "timing {} keys per pass with seed {}",
        config.count, config.seed,
    );
    let orders = KeyOrders::shuffled(config.count, config.seed);
    let avl = collect_timings::<AvlTree<i32>>(&orders)?;
    let rbt = collect_timings::<RedBlackTree<i32>>(&orders)?;

    let paths = vec![config.avl_path(), config.rbt_path()];
    write_timings(create(&paths[0])?, &avl)?;
    info!("wrote avl timings to {}", paths[0].display());
    write_timings(create(&paths[1])?, &rbt)?;
    info!("wrote red black timings to {}", paths[1].display());
    Ok(paths)
}

/// Runs the `deletion` experiment for both engines and writes both CSV files. Returns the
/// paths written, avl first.
pub fn run_deletion(config: &DeletionConfig) -> Result<Vec<PathBuf>> {
    config.validate()?;
    info!(
        "timing {} removals for tree sizes {} to {} with seed {}",
        config.delete_count, config.start, config.end, config.seed,
    );
    let avl = deletion_sweep::<AvlTree<i32>>(config)?;
    let rbt = deletion_sweep::<RedBlackTree<i32>>(config)?;

    let paths = vec![config.avl_path(), config.rbt_path()];
    write_samples(create(&paths[0])?, &avl)?;
    info!("wrote avl deletion timings to {}", paths[0].display());
    write_samples(create(&paths[1])?, &rbt)?;
    info!("wrote red black deletion timings to {}", paths[1].display());
    Ok(paths)
}
