//! The static catalog of ECMA-335 metadata tables.
//!
//! Every table defined in ECMA-335 §II.22 is described here as data: its
//! table number, its name, and its ordered column list. A single generic
//! accessor projects rows out of any table by consulting this catalog, so
//! there is no per-table row struct.

use crate::coded::CodedIndexKind;

/// An enumeration of all table types defined by ECMA-335.
///
/// The discriminant of each variant is its table number, i.e. its bit
/// position in the stream header's `Valid` and `Sorted` masks.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableType {
    /// `Module` table (0x00).
    Module = 0x00,
    /// `TypeRef` table (0x01).
    TypeRef = 0x01,
    /// `TypeDef` table (0x02).
    TypeDef = 0x02,
    /// `FieldPtr` table (0x03).
    FieldPtr = 0x03,
    /// `Field` table (0x04).
    Field = 0x04,
    /// `MethodPtr` table (0x05).
    MethodPtr = 0x05,
    /// `MethodDef` table (0x06).
    MethodDef = 0x06,
    /// `ParamPtr` table (0x07).
    ParamPtr = 0x07,
    /// `Param` table (0x08).
    Param = 0x08,
    /// `InterfaceImpl` table (0x09).
    InterfaceImpl = 0x09,
    /// `MemberRef` table (0x0A).
    MemberRef = 0x0A,
    /// `Constant` table (0x0B).
    Constant = 0x0B,
    /// `CustomAttribute` table (0x0C).
    CustomAttribute = 0x0C,
    /// `FieldMarshal` table (0x0D).
    FieldMarshal = 0x0D,
    /// `DeclSecurity` table (0x0E).
    DeclSecurity = 0x0E,
    /// `ClassLayout` table (0x0F).
    ClassLayout = 0x0F,
    /// `FieldLayout` table (0x10).
    FieldLayout = 0x10,
    /// `StandAloneSig` table (0x11).
    StandAloneSig = 0x11,
    /// `EventMap` table (0x12).
    EventMap = 0x12,
    /// `EventPtr` table (0x13).
    EventPtr = 0x13,
    /// `Event` table (0x14).
    Event = 0x14,
    /// `PropertyMap` table (0x15).
    PropertyMap = 0x15,
    /// `PropertyPtr` table (0x16).
    PropertyPtr = 0x16,
    /// `Property` table (0x17).
    Property = 0x17,
    /// `MethodSemantics` table (0x18).
    MethodSemantics = 0x18,
    /// `MethodImpl` table (0x19).
    MethodImpl = 0x19,
    /// `ModuleRef` table (0x1A).
    ModuleRef = 0x1A,
    /// `TypeSpec` table (0x1B).
    TypeSpec = 0x1B,
    /// `ImplMap` table (0x1C).
    ImplMap = 0x1C,
    /// `FieldRva` table (0x1D).
    FieldRva = 0x1D,
    /// `EncLog` table (0x1E).
    EncLog = 0x1E,
    /// `EncMap` table (0x1F).
    EncMap = 0x1F,
    /// `Assembly` table (0x20).
    Assembly = 0x20,
    /// `AssemblyProcessor` table (0x21).
    AssemblyProcessor = 0x21,
    /// `AssemblyOs` table (0x22).
    AssemblyOs = 0x22,
    /// `AssemblyRef` table (0x23).
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor` table (0x24).
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOs` table (0x25).
    AssemblyRefOs = 0x25,
    /// `File` table (0x26).
    File = 0x26,
    /// `ExportedType` table (0x27).
    ExportedType = 0x27,
    /// `ManifestResource` table (0x28).
    ManifestResource = 0x28,
    /// `NestedClass` table (0x29).
    NestedClass = 0x29,
    /// `GenericParam` table (0x2A).
    GenericParam = 0x2A,
    /// `MethodSpec` table (0x2B).
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` table (0x2C).
    GenericParamConstraint = 0x2C,
}

/// One of the metadata heaps a table column can point into.
///
/// The tables stream only needs the heaps' index widths; the heap contents
/// are read by the respective heap readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapKind {
    /// The `#Strings` heap.
    Strings,
    /// The `#GUID` heap.
    Guid,
    /// The `#Blob` heap.
    Blob,
}

/// How a table column's bytes are interpreted and sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// A fixed-width unsigned constant of the given byte width.
    Constant(u8),
    /// An index into one of the metadata heaps; 2 or 4 bytes wide depending
    /// on the header's `HeapSizes` byte.
    Heap(HeapKind),
    /// A 1-based row index into a single table; 2 or 4 bytes wide depending
    /// on the target's row count.
    Table(TableType),
    /// A tagged 1-based row index into one of several tables; 2 or 4 bytes
    /// wide depending on the maximum row count among the targets.
    Coded(CodedIndexKind),
}

/// A column in a metadata table, named as in ECMA-335 §II.22.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// The column's name.
    pub name: &'static str,
    /// The column's kind.
    pub kind: ColumnKind,
}

impl Column {
    const fn constant(name: &'static str, width: u8) -> Self {
        Self {
            name,
            kind: ColumnKind::Constant(width),
        }
    }

    const fn heap(name: &'static str, heap: HeapKind) -> Self {
        Self {
            name,
            kind: ColumnKind::Heap(heap),
        }
    }

    const fn table(name: &'static str, target: TableType) -> Self {
        Self {
            name,
            kind: ColumnKind::Table(target),
        }
    }

    const fn coded(name: &'static str, family: CodedIndexKind) -> Self {
        Self {
            name,
            kind: ColumnKind::Coded(family),
        }
    }
}

const MODULE: &[Column] = &[
    Column::constant("Generation", 2),
    Column::heap("Name", HeapKind::Strings),
    Column::heap("Mvid", HeapKind::Guid),
    Column::heap("EncId", HeapKind::Guid),
    Column::heap("EncBaseId", HeapKind::Guid),
];

const TYPE_REF: &[Column] = &[
    Column::coded("ResolutionScope", CodedIndexKind::ResolutionScope),
    Column::heap("TypeName", HeapKind::Strings),
    Column::heap("TypeNamespace", HeapKind::Strings),
];

const TYPE_DEF: &[Column] = &[
    Column::constant("Flags", 4),
    Column::heap("TypeName", HeapKind::Strings),
    Column::heap("TypeNamespace", HeapKind::Strings),
    Column::coded("Extends", CodedIndexKind::TypeDefOrRef),
    Column::table("FieldList", TableType::Field),
    Column::table("MethodList", TableType::MethodDef),
];

const FIELD_PTR: &[Column] = &[Column::table("Field", TableType::Field)];

const FIELD: &[Column] = &[
    Column::constant("Flags", 2),
    Column::heap("Name", HeapKind::Strings),
    Column::heap("Signature", HeapKind::Blob),
];

const METHOD_PTR: &[Column] = &[Column::table("Method", TableType::MethodDef)];

const METHOD_DEF: &[Column] = &[
    Column::constant("Rva", 4),
    Column::constant("ImplFlags", 2),
    Column::constant("Flags", 2),
    Column::heap("Name", HeapKind::Strings),
    Column::heap("Signature", HeapKind::Blob),
    Column::table("ParamList", TableType::Param),
];

const PARAM_PTR: &[Column] = &[Column::table("Param", TableType::Param)];

const PARAM: &[Column] = &[
    Column::constant("Flags", 2),
    Column::constant("Sequence", 2),
    Column::heap("Name", HeapKind::Strings),
];

const INTERFACE_IMPL: &[Column] = &[
    Column::table("Class", TableType::TypeDef),
    Column::coded("Interface", CodedIndexKind::TypeDefOrRef),
];

const MEMBER_REF: &[Column] = &[
    Column::coded("Class", CodedIndexKind::MemberRefParent),
    Column::heap("Name", HeapKind::Strings),
    Column::heap("Signature", HeapKind::Blob),
];

const CONSTANT: &[Column] = &[
    Column::constant("Type", 1),
    Column::constant("Padding", 1),
    Column::coded("Parent", CodedIndexKind::HasConstant),
    Column::heap("Value", HeapKind::Blob),
];

const CUSTOM_ATTRIBUTE: &[Column] = &[
    Column::coded("Parent", CodedIndexKind::HasCustomAttribute),
    Column::coded("Type", CodedIndexKind::CustomAttributeType),
    Column::heap("Value", HeapKind::Blob),
];

const FIELD_MARSHAL: &[Column] = &[
    Column::coded("Parent", CodedIndexKind::HasFieldMarshal),
    Column::heap("NativeType", HeapKind::Blob),
];

const DECL_SECURITY: &[Column] = &[
    Column::constant("Action", 2),
    Column::coded("Parent", CodedIndexKind::HasDeclSecurity),
    Column::heap("PermissionSet", HeapKind::Blob),
];

const CLASS_LAYOUT: &[Column] = &[
    Column::constant("PackingSize", 2),
    Column::constant("ClassSize", 4),
    Column::table("Parent", TableType::TypeDef),
];

const FIELD_LAYOUT: &[Column] = &[
    Column::constant("Offset", 4),
    Column::table("Field", TableType::Field),
];

const STAND_ALONE_SIG: &[Column] = &[Column::heap("Signature", HeapKind::Blob)];

const EVENT_MAP: &[Column] = &[
    Column::table("Parent", TableType::TypeDef),
    Column::table("EventList", TableType::Event),
];

const EVENT_PTR: &[Column] = &[Column::table("Event", TableType::Event)];

const EVENT: &[Column] = &[
    Column::constant("EventFlags", 2),
    Column::heap("Name", HeapKind::Strings),
    Column::coded("EventType", CodedIndexKind::TypeDefOrRef),
];

const PROPERTY_MAP: &[Column] = &[
    Column::table("Parent", TableType::TypeDef),
    Column::table("PropertyList", TableType::Property),
];

const PROPERTY_PTR: &[Column] = &[Column::table("Property", TableType::Property)];

const PROPERTY: &[Column] = &[
    Column::constant("Flags", 2),
    Column::heap("Name", HeapKind::Strings),
    Column::heap("Type", HeapKind::Blob),
];

const METHOD_SEMANTICS: &[Column] = &[
    Column::constant("Semantics", 2),
    Column::table("Method", TableType::MethodDef),
    Column::coded("Association", CodedIndexKind::HasSemantics),
];

const METHOD_IMPL: &[Column] = &[
    Column::table("Class", TableType::TypeDef),
    Column::coded("MethodBody", CodedIndexKind::MethodDefOrRef),
    Column::coded("MethodDeclaration", CodedIndexKind::MethodDefOrRef),
];

const MODULE_REF: &[Column] = &[Column::heap("Name", HeapKind::Strings)];

const TYPE_SPEC: &[Column] = &[Column::heap("Signature", HeapKind::Blob)];

const IMPL_MAP: &[Column] = &[
    Column::constant("MappingFlags", 2),
    Column::coded("MemberForwarded", CodedIndexKind::MemberForwarded),
    Column::heap("ImportName", HeapKind::Strings),
    Column::table("ImportScope", TableType::ModuleRef),
];

const FIELD_RVA: &[Column] = &[
    Column::constant("Rva", 4),
    Column::table("Field", TableType::Field),
];

const ENC_LOG: &[Column] = &[
    Column::constant("Token", 4),
    Column::constant("FuncCode", 4),
];

const ENC_MAP: &[Column] = &[Column::constant("Token", 4)];

const ASSEMBLY: &[Column] = &[
    Column::constant("HashAlgId", 4),
    Column::constant("MajorVersion", 2),
    Column::constant("MinorVersion", 2),
    Column::constant("BuildNumber", 2),
    Column::constant("RevisionNumber", 2),
    Column::constant("Flags", 4),
    Column::heap("PublicKey", HeapKind::Blob),
    Column::heap("Name", HeapKind::Strings),
    Column::heap("Culture", HeapKind::Strings),
];

const ASSEMBLY_PROCESSOR: &[Column] = &[Column::constant("Processor", 4)];

const ASSEMBLY_OS: &[Column] = &[
    Column::constant("OsPlatformId", 4),
    Column::constant("OsMajorVersion", 4),
    Column::constant("OsMinorVersion", 4),
];

const ASSEMBLY_REF: &[Column] = &[
    Column::constant("MajorVersion", 2),
    Column::constant("MinorVersion", 2),
    Column::constant("BuildNumber", 2),
    Column::constant("RevisionNumber", 2),
    Column::constant("Flags", 4),
    Column::heap("PublicKeyOrToken", HeapKind::Blob),
    Column::heap("Name", HeapKind::Strings),
    Column::heap("Culture", HeapKind::Strings),
    Column::heap("HashValue", HeapKind::Blob),
];

const ASSEMBLY_REF_PROCESSOR: &[Column] = &[
    Column::constant("Processor", 4),
    Column::table("AssemblyRef", TableType::AssemblyRef),
];

const ASSEMBLY_REF_OS: &[Column] = &[
    Column::constant("OsPlatformId", 4),
    Column::constant("OsMajorVersion", 4),
    Column::constant("OsMinorVersion", 4),
    Column::table("AssemblyRef", TableType::AssemblyRef),
];

const FILE: &[Column] = &[
    Column::constant("Flags", 4),
    Column::heap("Name", HeapKind::Strings),
    Column::heap("HashValue", HeapKind::Blob),
];

const EXPORTED_TYPE: &[Column] = &[
    Column::constant("Flags", 4),
    Column::constant("TypeDefId", 4),
    Column::heap("TypeName", HeapKind::Strings),
    Column::heap("TypeNamespace", HeapKind::Strings),
    Column::coded("Implementation", CodedIndexKind::Implementation),
];

const MANIFEST_RESOURCE: &[Column] = &[
    Column::constant("Offset", 4),
    Column::constant("Flags", 4),
    Column::heap("Name", HeapKind::Strings),
    Column::coded("Implementation", CodedIndexKind::Implementation),
];

const NESTED_CLASS: &[Column] = &[
    Column::table("NestedClass", TableType::TypeDef),
    Column::table("EnclosingClass", TableType::TypeDef),
];

const GENERIC_PARAM: &[Column] = &[
    Column::constant("Number", 2),
    Column::constant("Flags", 2),
    Column::coded("Owner", CodedIndexKind::TypeOrMethodDef),
    Column::heap("Name", HeapKind::Strings),
];

const METHOD_SPEC: &[Column] = &[
    Column::coded("Method", CodedIndexKind::MethodDefOrRef),
    Column::heap("Instantiation", HeapKind::Blob),
];

const GENERIC_PARAM_CONSTRAINT: &[Column] = &[
    Column::table("Owner", TableType::GenericParam),
    Column::coded("Constraint", CodedIndexKind::TypeDefOrRef),
];

impl TableType {
    /// Every table in the catalog, in ascending table-number order.
    pub const ALL: [TableType; 45] = [
        TableType::Module,
        TableType::TypeRef,
        TableType::TypeDef,
        TableType::FieldPtr,
        TableType::Field,
        TableType::MethodPtr,
        TableType::MethodDef,
        TableType::ParamPtr,
        TableType::Param,
        TableType::InterfaceImpl,
        TableType::MemberRef,
        TableType::Constant,
        TableType::CustomAttribute,
        TableType::FieldMarshal,
        TableType::DeclSecurity,
        TableType::ClassLayout,
        TableType::FieldLayout,
        TableType::StandAloneSig,
        TableType::EventMap,
        TableType::EventPtr,
        TableType::Event,
        TableType::PropertyMap,
        TableType::PropertyPtr,
        TableType::Property,
        TableType::MethodSemantics,
        TableType::MethodImpl,
        TableType::ModuleRef,
        TableType::TypeSpec,
        TableType::ImplMap,
        TableType::FieldRva,
        TableType::EncLog,
        TableType::EncMap,
        TableType::Assembly,
        TableType::AssemblyProcessor,
        TableType::AssemblyOs,
        TableType::AssemblyRef,
        TableType::AssemblyRefProcessor,
        TableType::AssemblyRefOs,
        TableType::File,
        TableType::ExportedType,
        TableType::ManifestResource,
        TableType::NestedClass,
        TableType::GenericParam,
        TableType::MethodSpec,
        TableType::GenericParamConstraint,
    ];

    /// Returns the table with the given table number, if the catalog
    /// defines one.
    pub fn from_number(number: u8) -> Option<TableType> {
        // Table numbers 0x00..=0x2C are contiguous; everything above is
        // either a Portable PDB extension or undefined.
        TableType::ALL.get(number as usize).copied()
    }

    /// The table's number, i.e. its bit position in the `Valid` mask.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// The table's name as given in ECMA-335 §II.22.
    pub fn name(self) -> &'static str {
        match self {
            TableType::Module => "Module",
            TableType::TypeRef => "TypeRef",
            TableType::TypeDef => "TypeDef",
            TableType::FieldPtr => "FieldPtr",
            TableType::Field => "Field",
            TableType::MethodPtr => "MethodPtr",
            TableType::MethodDef => "MethodDef",
            TableType::ParamPtr => "ParamPtr",
            TableType::Param => "Param",
            TableType::InterfaceImpl => "InterfaceImpl",
            TableType::MemberRef => "MemberRef",
            TableType::Constant => "Constant",
            TableType::CustomAttribute => "CustomAttribute",
            TableType::FieldMarshal => "FieldMarshal",
            TableType::DeclSecurity => "DeclSecurity",
            TableType::ClassLayout => "ClassLayout",
            TableType::FieldLayout => "FieldLayout",
            TableType::StandAloneSig => "StandAloneSig",
            TableType::EventMap => "EventMap",
            TableType::EventPtr => "EventPtr",
            TableType::Event => "Event",
            TableType::PropertyMap => "PropertyMap",
            TableType::PropertyPtr => "PropertyPtr",
            TableType::Property => "Property",
            TableType::MethodSemantics => "MethodSemantics",
            TableType::MethodImpl => "MethodImpl",
            TableType::ModuleRef => "ModuleRef",
            TableType::TypeSpec => "TypeSpec",
            TableType::ImplMap => "ImplMap",
            TableType::FieldRva => "FieldRva",
            TableType::EncLog => "EncLog",
            TableType::EncMap => "EncMap",
            TableType::Assembly => "Assembly",
            TableType::AssemblyProcessor => "AssemblyProcessor",
            TableType::AssemblyOs => "AssemblyOs",
            TableType::AssemblyRef => "AssemblyRef",
            TableType::AssemblyRefProcessor => "AssemblyRefProcessor",
            TableType::AssemblyRefOs => "AssemblyRefOs",
            TableType::File => "File",
            TableType::ExportedType => "ExportedType",
            TableType::ManifestResource => "ManifestResource",
            TableType::NestedClass => "NestedClass",
            TableType::GenericParam => "GenericParam",
            TableType::MethodSpec => "MethodSpec",
            TableType::GenericParamConstraint => "GenericParamConstraint",
        }
    }

    /// The table's ordered column list.
    pub fn columns(self) -> &'static [Column] {
        match self {
            TableType::Module => MODULE,
            TableType::TypeRef => TYPE_REF,
            TableType::TypeDef => TYPE_DEF,
            TableType::FieldPtr => FIELD_PTR,
            TableType::Field => FIELD,
            TableType::MethodPtr => METHOD_PTR,
            TableType::MethodDef => METHOD_DEF,
            TableType::ParamPtr => PARAM_PTR,
            TableType::Param => PARAM,
            TableType::InterfaceImpl => INTERFACE_IMPL,
            TableType::MemberRef => MEMBER_REF,
            TableType::Constant => CONSTANT,
            TableType::CustomAttribute => CUSTOM_ATTRIBUTE,
            TableType::FieldMarshal => FIELD_MARSHAL,
            TableType::DeclSecurity => DECL_SECURITY,
            TableType::ClassLayout => CLASS_LAYOUT,
            TableType::FieldLayout => FIELD_LAYOUT,
            TableType::StandAloneSig => STAND_ALONE_SIG,
            TableType::EventMap => EVENT_MAP,
            TableType::EventPtr => EVENT_PTR,
            TableType::Event => EVENT,
            TableType::PropertyMap => PROPERTY_MAP,
            TableType::PropertyPtr => PROPERTY_PTR,
            TableType::Property => PROPERTY,
            TableType::MethodSemantics => METHOD_SEMANTICS,
            TableType::MethodImpl => METHOD_IMPL,
            TableType::ModuleRef => MODULE_REF,
            TableType::TypeSpec => TYPE_SPEC,
            TableType::ImplMap => IMPL_MAP,
            TableType::FieldRva => FIELD_RVA,
            TableType::EncLog => ENC_LOG,
            TableType::EncMap => ENC_MAP,
            TableType::Assembly => ASSEMBLY,
            TableType::AssemblyProcessor => ASSEMBLY_PROCESSOR,
            TableType::AssemblyOs => ASSEMBLY_OS,
            TableType::AssemblyRef => ASSEMBLY_REF,
            TableType::AssemblyRefProcessor => ASSEMBLY_REF_PROCESSOR,
            TableType::AssemblyRefOs => ASSEMBLY_REF_OS,
            TableType::File => FILE,
            TableType::ExportedType => EXPORTED_TYPE,
            TableType::ManifestResource => MANIFEST_RESOURCE,
            TableType::NestedClass => NESTED_CLASS,
            TableType::GenericParam => GENERIC_PARAM,
            TableType::MethodSpec => METHOD_SPEC,
            TableType::GenericParamConstraint => GENERIC_PARAM_CONSTRAINT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MAX_COLUMNS;

    #[test]
    fn test_numbers_round_trip() {
        for (position, ty) in TableType::ALL.iter().enumerate() {
            assert_eq!(ty.number() as usize, position);
            assert_eq!(TableType::from_number(ty.number()), Some(*ty));
        }
        assert_eq!(TableType::from_number(0x2D), None);
        assert_eq!(TableType::from_number(0x3F), None);
    }

    #[test]
    fn test_column_lists() {
        for ty in TableType::ALL {
            let columns = ty.columns();
            assert!(!columns.is_empty(), "{} has no columns", ty.name());
            assert!(
                columns.len() <= MAX_COLUMNS,
                "{} exceeds the column limit",
                ty.name()
            );
            for column in columns {
                if let ColumnKind::Constant(width) = column.kind {
                    assert!(matches!(width, 1 | 2 | 4 | 8));
                }
            }
        }
    }

    #[test]
    fn test_known_layouts() {
        // Spot checks against §II.22.
        assert_eq!(TableType::Module.columns().len(), 5);
        assert_eq!(TableType::TypeDef.columns().len(), 6);
        assert_eq!(TableType::Assembly.columns().len(), 9);
        assert_eq!(TableType::AssemblyRef.columns().len(), 9);
        assert_eq!(TableType::TypeSpec.columns().len(), 1);
        assert_eq!(
            TableType::CustomAttribute.columns()[1].kind,
            ColumnKind::Coded(CodedIndexKind::CustomAttributeType)
        );
    }
}
