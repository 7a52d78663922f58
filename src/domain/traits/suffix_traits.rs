/// Provides the public suffix of a domain.
///
/// - the public suffix of `example.com` is `com`,
/// - the public suffix of `foo1.foo2.foo3.co.uk` is `co.uk`,
/// - the public suffix of `bar.pvt.k12.ma.us` is `pvt.k12.ma.us`.
///
/// An implementation that always returns an empty string is valid but
/// insecure: it lets `foo.com` set cookies for `bar.com`.
pub trait PublicSuffixList: Send + Sync + 'static {
    fn public_suffix(&self, domain: &str) -> String;

    /// Describes the source of the list, e.g. a version or timestamp.
    fn description(&self) -> String;
}
