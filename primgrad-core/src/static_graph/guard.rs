use crate::error::PrimGradError;
use crate::nn::init::Initializer;
use crate::static_graph::program::{Program, VarKind, Variable};
use crate::types::DType;

/// Binds a main and a startup program for graph construction.
///
/// Inputs and parameters are declared through the guard; ops are then
/// appended by the layer functions, which follow their operands' program.
#[derive(Debug)]
pub struct ProgramGuard<'a> {
    main: &'a Program,
    startup: &'a Program,
}

/// Opens a construction scope over `main` and `startup`.
pub fn program_guard<'a>(main: &'a Program, startup: &'a Program) -> ProgramGuard<'a> {
    ProgramGuard { main, startup }
}

impl<'a> ProgramGuard<'a> {
    pub fn main_program(&self) -> &'a Program {
        self.main
    }

    pub fn startup_program(&self) -> &'a Program {
        self.startup
    }

    /// Declares a fed input of the main program.
    ///
    /// Data variables start with `stop_gradient = true`.
    ///
    /// # Errors
    /// `DuplicateVariable` if the name is already taken.
    pub fn data(&self, name: &str, shape: &[usize], dtype: DType) -> Result<Variable, PrimGradError> {
        self.main
            .create_var(Some(name), "data", shape.to_vec(), dtype, VarKind::Data)
    }

    /// Declares a trainable parameter.
    ///
    /// The parameter is declared in both programs; the startup program gets
    /// the op produced by `initializer`. Returns the main-program handle.
    pub fn create_parameter(
        &self,
        name: &str,
        shape: &[usize],
        dtype: DType,
        initializer: Initializer,
    ) -> Result<Variable, PrimGradError> {
        if self.main.find_var(name).is_some() || self.startup.find_var(name).is_some() {
            return Err(PrimGradError::DuplicateVariable(name.to_string()));
        }
        let kind = initializer.to_op_kind(shape, dtype, self.startup.next_op_seed())?;
        let init_var =
            self.startup
                .create_var(Some(name), "param", shape.to_vec(), dtype, VarKind::Parameter)?;
        self.startup.append_op_into(kind, &[], &init_var)?;
        self.main
            .create_var(Some(name), "param", shape.to_vec(), dtype, VarKind::Parameter)
    }
}
