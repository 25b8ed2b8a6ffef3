//! The coarse Solidity type model used for navigation and diagnostics.
//!
//! This is intentionally not a verifying type system; it knows just
//! enough to answer "what can this expression be assigned to" and "what
//! type does this receiver have".

use smol_str::SmolStr;

/// A Solidity type with the metadata the analyzer cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolType {
    pub name: SmolStr,
    pub is_array: bool,
    pub array_size: Option<usize>,
    pub is_mapping: bool,
}

impl SolType {
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            is_array: false,
            array_size: None,
            is_mapping: false,
        }
    }

    pub fn unknown() -> Self {
        Self::named("unknown")
    }

    pub fn is_unknown(&self) -> bool {
        self.name == "unknown"
    }

    /// Parse a type string as written in source (`uint256`, `address[]`,
    /// `bytes32[4]`, `mapping(address => uint256)`).
    pub fn parse(type_name: &str) -> Self {
        let type_name = type_name.trim();

        if let Some(base) = type_name.strip_suffix("[]") {
            let mut ty = Self::named(base);
            ty.is_array = true;
            return ty;
        }

        // Fixed-size arrays: `T[n]`
        if type_name.ends_with(']') {
            if let Some(bracket) = type_name.find('[') {
                let size_str = &type_name[bracket + 1..type_name.len() - 1];
                if let Ok(size) = size_str.parse::<usize>() {
                    let mut ty = Self::named(&type_name[..bracket]);
                    ty.is_array = true;
                    ty.array_size = Some(size);
                    return ty;
                }
            }
        }

        if type_name.starts_with("mapping(") {
            let mut ty = Self::named("mapping");
            ty.is_mapping = true;
            return ty;
        }

        Self::named(type_name)
    }

    /// `uint*`/`int*` (including the unsuffixed aliases).
    pub fn is_numeric(&self) -> bool {
        !self.is_array
            && !self.is_mapping
            && (self.name.starts_with("uint") || self.name.starts_with("int"))
    }

    /// Coarse assignment/inference compatibility: identical names match,
    /// any two numeric types match, and `address` accepts
    /// `address payable`.
    pub fn is_compatible_with(&self, other: &SolType) -> bool {
        if self.name == other.name && self.is_array == other.is_array {
            return true;
        }

        if self.is_numeric() && other.is_numeric() {
            return true;
        }

        if self.name == "address" && (other.name == "address" || other.name == "address payable") {
            return true;
        }

        false
    }
}

impl std::fmt::Display for SolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_array {
            match self.array_size {
                Some(size) => write!(f, "{}[{}]", self.name, size),
                None => write!(f, "{}[]", self.name),
            }
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dynamic_array() {
        let ty = SolType::parse("address[]");
        assert_eq!(ty.name, "address");
        assert!(ty.is_array);
        assert_eq!(ty.array_size, None);
        assert_eq!(ty.to_string(), "address[]");
    }

    #[test]
    fn test_parse_fixed_array() {
        let ty = SolType::parse("bytes32[4]");
        assert!(ty.is_array);
        assert_eq!(ty.array_size, Some(4));
    }

    #[test]
    fn test_parse_mapping() {
        let ty = SolType::parse("mapping(address => uint256)");
        assert!(ty.is_mapping);
    }

    #[test]
    fn test_numeric_compatibility() {
        let a = SolType::named("uint8");
        let b = SolType::named("uint256");
        assert!(a.is_compatible_with(&b));
        assert!(b.is_compatible_with(&a));
        assert!(!SolType::named("bool").is_compatible_with(&a));
    }

    #[test]
    fn test_address_payable_compatibility() {
        let addr = SolType::named("address");
        let payable = SolType::named("address payable");
        assert!(addr.is_compatible_with(&payable));
    }

    #[test]
    fn test_array_not_numeric() {
        assert!(!SolType::parse("uint256[]").is_numeric());
    }
}
