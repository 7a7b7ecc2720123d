//! Ordering of the CNAME records of an answer into one alias chain.

use super::record_filter::TypedRecord;
use hickory_proto::rr::rdata::CNAME;
use hickory_proto::rr::Name;

/// One `owner -> target` alias.
pub trait AliasLink {
    fn owner(&self) -> &Name;
    fn target(&self) -> &Name;
}

impl AliasLink for TypedRecord<'_, CNAME> {
    fn owner(&self) -> &Name {
        self.name
    }

    fn target(&self) -> &Name {
        &self.data.0
    }
}

/// Reorders `links` into a single chain where each owner equals the previous
/// target. Returns false when the links do not form exactly one linear chain
/// (a disjoint alias or a cycle); `links` is then left in an unspecified order.
///
/// `links[..sorted]` is the chain built so far. Each pass moves a link whose
/// target is the head's owner to the front, or swaps a link whose owner is
/// the tail's target to the end of the chain.
pub fn order_chain<L: AliasLink>(links: &mut [L]) -> bool {
    if links.len() < 2 {
        return links.first().map_or(true, |link| link.owner() != link.target());
    }

    let mut sorted = 1;
    loop {
        let before = sorted;
        let mut i = sorted;
        while i < links.len() {
            if links[i].target() == links[0].owner() {
                links[..=i].rotate_right(1);
                sorted += 1;
            } else if links[i].owner() == links[sorted - 1].target() {
                links.swap(i, sorted);
                sorted += 1;
            }
            i += 1;
        }
        if sorted == links.len() || sorted == before {
            break;
        }
    }

    sorted == links.len() && links[sorted - 1].target() != links[0].owner()
}
