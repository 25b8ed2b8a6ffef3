//! Library method resolution.
//!
//! Solidity's `using Library for Type;` attaches a library's functions to
//! a type so they can be called with method syntax. This module discovers
//! libraries, using directives, and variable types per file, and maps a
//! call written as `receiver.method(...)` to the concrete library
//! function `L.method(ReceiverType, ...)` under the wildcard and
//! type-compatibility rules.

mod library;
mod resolve;
mod scan;

pub use library::{
    AttachedFunction, DirectiveScope, LibraryFunction, MethodCallContext, UsingDirectiveInfo,
    types_compatible,
};
pub use resolve::LibraryIndex;
pub use scan::FileLibraryInfo;
