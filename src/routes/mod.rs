pub(crate) mod alerts;
pub(crate) mod health;
pub(crate) mod products;
pub(crate) mod scans;
