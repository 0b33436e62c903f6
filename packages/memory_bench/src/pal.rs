//! Platform Abstraction Layer (PAL). All operating system calls made to pin worker threads go
//! through here, so unit tests can replace them with mocks.

mod abstractions;
pub(crate) use abstractions::*;

mod facade;
pub(crate) use facade::*;

mod real;
pub(crate) use real::*;
