use crate::modules::movies::domain::entities::CastMember;

/// Rewrite every cast position to its index in the list: zero-based, dense,
/// no gaps. This is the sole writer of `position` and runs on every aggregate
/// write, whether or not the membership changed, so stale positions from a
/// prior state can never leak through.
pub fn assign_positions(cast: &mut [CastMember]) {
    for (index, member) in cast.iter_mut().enumerate() {
        member.position = index as i32;
    }
}
