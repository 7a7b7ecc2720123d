//! One printer per query kind; all output goes to stdout.

mod discovery;
mod lookup;

pub use discovery::{print_naptr, print_probe, print_ptr_probe, print_services};
pub use lookup::{print_ips, print_lookup, print_nameservers};
