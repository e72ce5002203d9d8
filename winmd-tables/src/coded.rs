//! The coded-index families of ECMA-335 §II.24.2.6.
//!
//! A coded index multiplexes references to several target tables into a
//! single field: the low `t` tag bits select the target table, the remaining
//! bits carry the 1-based row number. `t` is the number of bits needed to
//! distinguish the family's targets, and the stored field is 2 bytes unless
//! some target's row count forces 4.

use crate::catalog::TableType;
use crate::error::{FormatError, FormatErrorKind};

/// An enumeration of the thirteen coded-index families defined by ECMA-335.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodedIndexKind {
    /// `TypeDef`, `TypeRef`, or `TypeSpec`.
    TypeDefOrRef,
    /// `Field`, `Param`, or `Property`.
    HasConstant,
    /// Any of the 22 tables that can carry a custom attribute.
    HasCustomAttribute,
    /// `Field` or `Param`.
    HasFieldMarshal,
    /// `TypeDef`, `MethodDef`, or `Assembly`.
    HasDeclSecurity,
    /// `TypeDef`, `TypeRef`, `ModuleRef`, `MethodDef`, or `TypeSpec`.
    MemberRefParent,
    /// `Event` or `Property`.
    HasSemantics,
    /// `MethodDef` or `MemberRef`.
    MethodDefOrRef,
    /// `Field` or `MethodDef`.
    MemberForwarded,
    /// `File`, `AssemblyRef`, or `ExportedType`.
    Implementation,
    /// `MethodDef` or `MemberRef`; three of its five tag slots are unused.
    CustomAttributeType,
    /// `Module`, `ModuleRef`, `AssemblyRef`, or `TypeRef`.
    ResolutionScope,
    /// `TypeDef` or `MethodDef`.
    TypeOrMethodDef,
}

const TYPE_DEF_OR_REF: &[Option<TableType>] = &[
    Some(TableType::TypeDef),
    Some(TableType::TypeRef),
    Some(TableType::TypeSpec),
];

const HAS_CONSTANT: &[Option<TableType>] = &[
    Some(TableType::Field),
    Some(TableType::Param),
    Some(TableType::Property),
];

const HAS_CUSTOM_ATTRIBUTE: &[Option<TableType>] = &[
    Some(TableType::MethodDef),
    Some(TableType::Field),
    Some(TableType::TypeRef),
    Some(TableType::TypeDef),
    Some(TableType::Param),
    Some(TableType::InterfaceImpl),
    Some(TableType::MemberRef),
    Some(TableType::Module),
    Some(TableType::DeclSecurity),
    Some(TableType::Property),
    Some(TableType::Event),
    Some(TableType::StandAloneSig),
    Some(TableType::ModuleRef),
    Some(TableType::TypeSpec),
    Some(TableType::Assembly),
    Some(TableType::AssemblyRef),
    Some(TableType::File),
    Some(TableType::ExportedType),
    Some(TableType::ManifestResource),
    Some(TableType::GenericParam),
    Some(TableType::GenericParamConstraint),
    Some(TableType::MethodSpec),
];

const HAS_FIELD_MARSHAL: &[Option<TableType>] =
    &[Some(TableType::Field), Some(TableType::Param)];

const HAS_DECL_SECURITY: &[Option<TableType>] = &[
    Some(TableType::TypeDef),
    Some(TableType::MethodDef),
    Some(TableType::Assembly),
];

const MEMBER_REF_PARENT: &[Option<TableType>] = &[
    Some(TableType::TypeDef),
    Some(TableType::TypeRef),
    Some(TableType::ModuleRef),
    Some(TableType::MethodDef),
    Some(TableType::TypeSpec),
];

const HAS_SEMANTICS: &[Option<TableType>] =
    &[Some(TableType::Event), Some(TableType::Property)];

const METHOD_DEF_OR_REF: &[Option<TableType>] =
    &[Some(TableType::MethodDef), Some(TableType::MemberRef)];

const MEMBER_FORWARDED: &[Option<TableType>] =
    &[Some(TableType::Field), Some(TableType::MethodDef)];

const IMPLEMENTATION: &[Option<TableType>] = &[
    Some(TableType::File),
    Some(TableType::AssemblyRef),
    Some(TableType::ExportedType),
];

// Tags 0, 1, and 4 are reserved and must not appear in a file.
const CUSTOM_ATTRIBUTE_TYPE: &[Option<TableType>] = &[
    None,
    None,
    Some(TableType::MethodDef),
    Some(TableType::MemberRef),
    None,
];

const RESOLUTION_SCOPE: &[Option<TableType>] = &[
    Some(TableType::Module),
    Some(TableType::ModuleRef),
    Some(TableType::AssemblyRef),
    Some(TableType::TypeRef),
];

const TYPE_OR_METHOD_DEF: &[Option<TableType>] =
    &[Some(TableType::TypeDef), Some(TableType::MethodDef)];

impl CodedIndexKind {
    /// The family's ordered target list.
    ///
    /// Unused tag slots are `None`; the slot position is the tag value.
    pub fn targets(self) -> &'static [Option<TableType>] {
        match self {
            CodedIndexKind::TypeDefOrRef => TYPE_DEF_OR_REF,
            CodedIndexKind::HasConstant => HAS_CONSTANT,
            CodedIndexKind::HasCustomAttribute => HAS_CUSTOM_ATTRIBUTE,
            CodedIndexKind::HasFieldMarshal => HAS_FIELD_MARSHAL,
            CodedIndexKind::HasDeclSecurity => HAS_DECL_SECURITY,
            CodedIndexKind::MemberRefParent => MEMBER_REF_PARENT,
            CodedIndexKind::HasSemantics => HAS_SEMANTICS,
            CodedIndexKind::MethodDefOrRef => METHOD_DEF_OR_REF,
            CodedIndexKind::MemberForwarded => MEMBER_FORWARDED,
            CodedIndexKind::Implementation => IMPLEMENTATION,
            CodedIndexKind::CustomAttributeType => CUSTOM_ATTRIBUTE_TYPE,
            CodedIndexKind::ResolutionScope => RESOLUTION_SCOPE,
            CodedIndexKind::TypeOrMethodDef => TYPE_OR_METHOD_DEF,
        }
    }

    /// The number of bits needed to distinguish the family's targets,
    /// i.e. `ceil(log2(targets.len()))`.
    pub fn tag_bits(self) -> u32 {
        let mut len = self.targets().len() - 1;
        let mut bits = 1;
        loop {
            len >>= 1;
            if len == 0 {
                break;
            }
            bits += 1;
        }
        bits
    }

    /// The stored width in bytes of a coded index of this family: 4 if any
    /// target's row count needs more than the `16 - tag_bits` bits left in
    /// a 2-byte field, else 2.
    pub fn index_size(self, row_counts: &[u32; 64]) -> u8 {
        let bits = self.tag_bits();
        let small = self
            .targets()
            .iter()
            .filter_map(|target| *target)
            .all(|target| (row_counts[target as usize] as u64) < (1u64 << (16 - bits)));
        if small {
            2
        } else {
            4
        }
    }

    /// Splits a stored coded-index value into its target table and 1-based
    /// row number (0 meaning absent).
    ///
    /// Fails with `BadCodedIndex` if the tag does not select a target.
    pub fn decode(self, value: u32) -> Result<(TableType, u32), FormatError> {
        let bits = self.tag_bits();
        let tag = value & ((1 << bits) - 1);
        let table = self
            .targets()
            .get(tag as usize)
            .copied()
            .flatten()
            .ok_or(FormatErrorKind::BadCodedIndex(self, tag))?;
        Ok((table, value >> bits))
    }

    /// Packs a target table and row number back into a stored value; the
    /// inverse of [`decode`](Self::decode).
    ///
    /// Returns `None` if the table is not a member of this family.
    pub fn encode(self, table: TableType, row: u32) -> Option<u32> {
        let tag = self
            .targets()
            .iter()
            .position(|target| *target == Some(table))?;
        Some((row << self.tag_bits()) | tag as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [CodedIndexKind; 13] = [
        CodedIndexKind::TypeDefOrRef,
        CodedIndexKind::HasConstant,
        CodedIndexKind::HasCustomAttribute,
        CodedIndexKind::HasFieldMarshal,
        CodedIndexKind::HasDeclSecurity,
        CodedIndexKind::MemberRefParent,
        CodedIndexKind::HasSemantics,
        CodedIndexKind::MethodDefOrRef,
        CodedIndexKind::MemberForwarded,
        CodedIndexKind::Implementation,
        CodedIndexKind::CustomAttributeType,
        CodedIndexKind::ResolutionScope,
        CodedIndexKind::TypeOrMethodDef,
    ];

    #[test]
    fn test_tag_bits() {
        let expected = [2, 2, 5, 1, 2, 3, 1, 1, 1, 2, 3, 2, 1];
        for (kind, bits) in ALL_KINDS.iter().zip(expected) {
            assert_eq!(kind.tag_bits(), bits, "{kind:?}");
        }
    }

    #[test]
    fn test_decode() {
        // 0x000D = row 3 with tag 1.
        assert_eq!(
            CodedIndexKind::TypeDefOrRef.decode(0x000D).unwrap(),
            (TableType::TypeRef, 3)
        );
        // A stored zero decodes to tag 0, row 0: absent.
        assert_eq!(
            CodedIndexKind::TypeDefOrRef.decode(0).unwrap(),
            (TableType::TypeDef, 0)
        );
    }

    #[test]
    fn test_decode_bad_tag() {
        let err = CodedIndexKind::TypeDefOrRef.decode(0x0007).unwrap_err();
        assert!(matches!(
            err.kind(),
            FormatErrorKind::BadCodedIndex(CodedIndexKind::TypeDefOrRef, 3)
        ));
    }

    #[test]
    fn test_custom_attribute_type_slots() {
        let kind = CodedIndexKind::CustomAttributeType;
        assert_eq!(kind.decode(0x0B).unwrap(), (TableType::MemberRef, 1));
        for reserved in [0u32, 1, 4] {
            assert!(matches!(
                kind.decode(reserved).unwrap_err().kind(),
                FormatErrorKind::BadCodedIndex(CodedIndexKind::CustomAttributeType, _)
            ));
        }
    }

    #[test]
    fn test_encode_non_member() {
        assert_eq!(
            CodedIndexKind::TypeDefOrRef.encode(TableType::Field, 1),
            None
        );
    }

    #[test]
    fn test_round_trip() {
        for kind in ALL_KINDS {
            let bits = kind.tag_bits();
            let max_row = u32::MAX >> bits;
            for (tag, target) in kind.targets().iter().enumerate() {
                let Some(table) = target else { continue };
                for row in [0u32, 1, 0x3FF, max_row] {
                    let value = kind.encode(*table, row).unwrap();
                    assert_eq!(value & ((1 << bits) - 1), tag as u32);
                    assert_eq!(kind.decode(value).unwrap(), (*table, row));
                }
            }
        }
    }

    #[test]
    fn test_index_size_threshold() {
        let mut row_counts = [0u32; 64];

        // 22 targets need 5 tag bits, leaving 11 bits of row number.
        let kind = CodedIndexKind::HasCustomAttribute;
        row_counts[TableType::MethodDef as usize] = 2047;
        assert_eq!(kind.index_size(&row_counts), 2);
        row_counts[TableType::MethodDef as usize] = 2048;
        assert_eq!(kind.index_size(&row_counts), 4);

        // Row counts of non-member tables do not matter.
        let mut row_counts = [0u32; 64];
        row_counts[TableType::Module as usize] = u32::MAX;
        assert_eq!(CodedIndexKind::HasSemantics.index_size(&row_counts), 2);
    }
}
