mod sorted_vec;

pub use sorted_vec::SortedVec;
