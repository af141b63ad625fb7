//! Region Shape Module
//!
//! Shortcut enums that fix how a region holds its data. The shape is chosen
//! when a region is created and never changes afterwards.

use std::fmt;
use std::str::FromStr;

// == Client Region Shape ==
/// Shapes available to regions of a client-tier cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClientRegionShape {
    /// Data held only in this process's memory
    #[default]
    Local,
    /// Local data bounded by an entry-count LRU
    LocalHeapLru,
}

// == Peer Region Shape ==
/// Shapes available to regions of a peer cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegionShape {
    /// Entries distributed over buckets by key
    #[default]
    Partition,
    /// Partitioned and bounded by an entry-count LRU
    PartitionLru,
    /// Every member holds every entry
    Replicate,
    /// Member-local data, never distributed
    Local,
}

/// Storage layout a shape resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Single,
    Bucketed,
}

/// Region shape as recorded on a created region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Client(ClientRegionShape),
    Peer(RegionShape),
}

impl ClientRegionShape {
    pub fn name(&self) -> &'static str {
        match self {
            ClientRegionShape::Local => "LOCAL",
            ClientRegionShape::LocalHeapLru => "LOCAL_HEAP_LRU",
        }
    }
}

impl RegionShape {
    pub fn name(&self) -> &'static str {
        match self {
            RegionShape::Partition => "PARTITION",
            RegionShape::PartitionLru => "PARTITION_HEAP_LRU",
            RegionShape::Replicate => "REPLICATE",
            RegionShape::Local => "LOCAL",
        }
    }
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Client(shape) => shape.name(),
            Shape::Peer(shape) => shape.name(),
        }
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Shape::Client(_))
    }

    pub fn is_partitioned(&self) -> bool {
        self.layout() == Layout::Bucketed
    }

    pub fn layout(&self) -> Layout {
        match self {
            Shape::Peer(RegionShape::Partition | RegionShape::PartitionLru) => Layout::Bucketed,
            _ => Layout::Single,
        }
    }

    /// Returns true if the shape caps its entry count with LRU eviction.
    pub fn is_lru(&self) -> bool {
        matches!(
            self,
            Shape::Client(ClientRegionShape::LocalHeapLru) | Shape::Peer(RegionShape::PartitionLru)
        )
    }
}

// == Parsing ==
/// Folds `LOCAL_HEAP_LRU`, `local-heap-lru` and `LocalHeapLru` to one form.
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_ascii_lowercase()
}

impl FromStr for ClientRegionShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "local" => Ok(ClientRegionShape::Local),
            "localheaplru" => Ok(ClientRegionShape::LocalHeapLru),
            _ => Err("unknown client region shape, expected LOCAL or LOCAL_HEAP_LRU".to_string()),
        }
    }
}

impl FromStr for RegionShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "partition" => Ok(RegionShape::Partition),
            "partitionheaplru" | "partitionlru" => Ok(RegionShape::PartitionLru),
            "replicate" => Ok(RegionShape::Replicate),
            "local" => Ok(RegionShape::Local),
            _ => Err(
                "unknown peer region shape, expected PARTITION, PARTITION_HEAP_LRU, REPLICATE or LOCAL"
                    .to_string(),
            ),
        }
    }
}

impl fmt::Display for ClientRegionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for RegionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_defaults() {
        assert_eq!(ClientRegionShape::default(), ClientRegionShape::Local);
        assert_eq!(RegionShape::default(), RegionShape::Partition);
    }

    #[test]
    fn test_shape_parse_accepts_spellings() {
        assert_eq!("LOCAL_HEAP_LRU".parse(), Ok(ClientRegionShape::LocalHeapLru));
        assert_eq!("local-heap-lru".parse(), Ok(ClientRegionShape::LocalHeapLru));
        assert_eq!("Partition".parse(), Ok(RegionShape::Partition));
        assert_eq!("PARTITION_HEAP_LRU".parse(), Ok(RegionShape::PartitionLru));
        assert!("PROXY".parse::<ClientRegionShape>().is_err());
        assert!("".parse::<RegionShape>().is_err());
    }

    #[test]
    fn test_shape_layout() {
        assert!(Shape::Peer(RegionShape::Partition).is_partitioned());
        assert!(Shape::Peer(RegionShape::PartitionLru).is_partitioned());
        assert!(!Shape::Peer(RegionShape::Replicate).is_partitioned());
        assert!(!Shape::Client(ClientRegionShape::Local).is_partitioned());
        assert!(Shape::Client(ClientRegionShape::Local).is_client());
    }

    #[test]
    fn test_shape_lru() {
        assert!(Shape::Client(ClientRegionShape::LocalHeapLru).is_lru());
        assert!(!Shape::Peer(RegionShape::Partition).is_lru());
    }
}
