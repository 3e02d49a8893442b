use std::fmt;

macro_rules! memory_sizes {
    ($($name:ident => ($size:expr, $element:expr, $broadcast:expr),)*) => {
        /// the shape of the memory an operand references.
        ///
        /// `PackedN_T` reads `N` bits as a vector of `T`, `BroadcastN_T` reads a single `T`
        /// and replicates it across an `N`-bit vector.
        #[allow(non_camel_case_types)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
        pub enum MemorySize {
            #[default]
            $($name,)*
        }

        impl MemorySize {
            /// return the number of bytes referenced by this memory access.
            ///
            /// broadcasts reference a single element, so this is the element size for them.
            pub const fn size(self) -> usize {
                match self {
                    $(Self::$name => $size,)*
                }
            }

            /// return the number of bytes in a single element of this memory access.
            pub const fn element_size(self) -> usize {
                match self {
                    $(Self::$name => $element,)*
                }
            }

            /// whether a single element is read and replicated across the vector.
            pub const fn is_broadcast(self) -> bool {
                match self {
                    $(Self::$name => $broadcast,)*
                }
            }
        }
    };
}

memory_sizes! {
    Unknown => (0, 0, false),
    Float32 => (4, 4, false),
    Float64 => (8, 8, false),
    UInt64 => (8, 8, false),

    Packed64_UInt8 => (8, 1, false),
    Packed64_UInt16 => (8, 2, false),

    Packed128_Int8 => (16, 1, false),
    Packed128_UInt8 => (16, 1, false),
    Packed128_Int16 => (16, 2, false),
    Packed128_UInt16 => (16, 2, false),
    Packed128_Int32 => (16, 4, false),
    Packed128_UInt32 => (16, 4, false),
    Packed128_Int64 => (16, 8, false),
    Packed128_UInt64 => (16, 8, false),
    Packed128_Float32 => (16, 4, false),
    Packed128_Float64 => (16, 8, false),

    Packed256_Int8 => (32, 1, false),
    Packed256_UInt8 => (32, 1, false),
    Packed256_Int16 => (32, 2, false),
    Packed256_UInt16 => (32, 2, false),
    Packed256_Int32 => (32, 4, false),
    Packed256_UInt32 => (32, 4, false),
    Packed256_Int64 => (32, 8, false),
    Packed256_UInt64 => (32, 8, false),
    Packed256_Float32 => (32, 4, false),
    Packed256_Float64 => (32, 8, false),

    Packed512_Int8 => (64, 1, false),
    Packed512_UInt8 => (64, 1, false),
    Packed512_Int16 => (64, 2, false),
    Packed512_UInt16 => (64, 2, false),
    Packed512_Int32 => (64, 4, false),
    Packed512_UInt32 => (64, 4, false),
    Packed512_Int64 => (64, 8, false),
    Packed512_UInt64 => (64, 8, false),
    Packed512_Float32 => (64, 4, false),
    Packed512_Float64 => (64, 8, false),

    Broadcast128_Int32 => (4, 4, true),
    Broadcast128_UInt32 => (4, 4, true),
    Broadcast128_Int64 => (8, 8, true),
    Broadcast128_UInt64 => (8, 8, true),
    Broadcast128_Float32 => (4, 4, true),
    Broadcast128_Float64 => (8, 8, true),

    Broadcast256_Int32 => (4, 4, true),
    Broadcast256_UInt32 => (4, 4, true),
    Broadcast256_Int64 => (8, 8, true),
    Broadcast256_UInt64 => (8, 8, true),
    Broadcast256_Float32 => (4, 4, true),
    Broadcast256_Float64 => (8, 8, true),

    Broadcast512_Int32 => (4, 4, true),
    Broadcast512_UInt32 => (4, 4, true),
    Broadcast512_Int64 => (8, 8, true),
    Broadcast512_UInt64 => (8, 8, true),
    Broadcast512_Float32 => (4, 4, true),
    Broadcast512_Float64 => (8, 8, true),
}

impl MemorySize {
    /// a human-friendly label for the number of bytes this memory access references.
    ///
    /// | size (bytes) | name       |
    /// |--------------|------------|
    /// | 4            | `dword`    |
    /// | 8            | `qword`    |
    /// | 16           | `xmmword`  |
    /// | 32           | `ymmword`  |
    /// | 64           | `zmmword`  |
    pub fn size_name(self) -> &'static str {
        match self.size() {
            1 => "byte",
            2 => "word",
            4 => "dword",
            8 => "qword",
            16 => "xmmword",
            32 => "ymmword",
            64 => "zmmword",
            _ => "ptr",
        }
    }
}

impl fmt::Display for MemorySize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_broadcast() {
            write!(f, "{} bcst", self.size_name())
        } else {
            f.write_str(self.size_name())
        }
    }
}
