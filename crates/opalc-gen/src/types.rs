//! Translation of Opal type names to LLVM types.

use inkwell::types::{BasicTypeEnum, StructType};

use crate::error::{CodeGenError, Result};
use crate::llvm::CodeGen;

impl<'ctx> CodeGen<'ctx> {
    /// Translates a textual type name into an LLVM type.
    ///
    /// `string` becomes a byte pointer; the numeric names map to their
    /// LLVM counterparts; any other name must be a registered struct type.
    pub(crate) fn basic_type(&self, name: &str) -> Result<BasicTypeEnum<'ctx>> {
        let ty = match name {
            "string" => self
                .context
                .i8_type()
                .ptr_type(inkwell::AddressSpace::default())
                .into(),
            "f32" => self.context.f32_type().into(),
            "f64" => self.context.f64_type().into(),
            "i32" => self.context.i32_type().into(),
            "i64" => self.context.i64_type().into(),
            other => match self.struct_type(other) {
                Some(st) => st.into(),
                None => return Err(CodeGenError::UnknownType(other.to_string())),
            },
        };
        Ok(ty)
    }

    /// Creates and registers the LLVM type for a struct declaration.
    ///
    /// The parsed body is not consulted yet: every struct gets three
    /// `float` members. Re-registration returns the existing type.
    pub(crate) fn declare_struct(&mut self, name: &str) -> Result<StructType<'ctx>> {
        if let Some(existing) = self.struct_type(name) {
            return Ok(existing);
        }

        let st = self.context.opaque_struct_type(name);
        let f32_type = self.context.f32_type();
        st.set_body(&[f32_type.into(), f32_type.into(), f32_type.into()], false);

        self.register_struct(name, st);
        Ok(st)
    }
}
