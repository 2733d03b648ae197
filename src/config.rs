/// Configuration for the k-means engine
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,

    /// Maximum number of iterations. Bounds the runtime of non-converging inputs.
    pub max_iters: usize,

    /// Convergence tolerance. The run stops once the total centroid shift of an
    /// iteration is strictly below this value. `f64::INFINITY` stops after the
    /// first iteration; a negative value never stops early.
    pub tol: f64,

    /// Random seed for centroid initialization.
    /// `None` seeds from OS entropy, so repeated runs may differ.
    pub seed: Option<u64>,

    /// Log every iteration at `info` instead of `debug`
    pub verbose: bool,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 2,
            max_iters: 100,
            tol: 1e-4,
            seed: None,
            verbose: false,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set verbose mode
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
