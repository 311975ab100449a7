/// Decides whether a presented bearer credential is acceptable
pub trait Authenticator: Send + Sync + 'static {
    fn verify(&self, presented: &str) -> bool;
}
