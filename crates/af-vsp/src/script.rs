//! `main()` envelope for generated statements.

const API_ERROR_CHECK: &str = "    
//==== Check For API Errors ====//
while ( GetNumTotalErrors() > 0 )
{
    ErrorObj err = PopLastError();
    Print( err.GetErrorString() );
}
";

const SHADE_ALL_GEOMS: &str = "
{
    array<string> @geomids = FindGeoms();
    
    for (uint i = 0; i < geomids.length(); i++)
    {
        SetGeomDrawType( geomids[i], GEOM_DRAW_SHADE );
    }
}
        
";

/// Banner and trailer settings for [`wrap_script`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VspScriptOptions {
    pub generator_name: String,
    pub generator_version: String,
    /// OpenVSP release the emitted syntax was checked against
    pub openvsp_version: String,
    pub set_geom_draw_type_to_shade: bool,
}

impl Default for VspScriptOptions {
    fn default() -> Self {
        Self {
            generator_name: "airframe".to_string(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            openvsp_version: "3.36.0".to_string(),
            set_geom_draw_type_to_shade: true,
        }
    }
}

impl VspScriptOptions {
    pub fn without_shading(mut self) -> Self {
        self.set_geom_draw_type_to_shade = false;
        self
    }
}

/// Prefix every line that is not whitespace-only.
pub fn indent(text: &str, prefix: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect()
}

/// Wrap script statements in a `main()` function, followed by an API error
/// dump and optionally a switch of every geometry to shaded display.
pub fn wrap_script(script: &str, options: &VspScriptOptions) -> String {
    let mut body = String::with_capacity(script.len() + API_ERROR_CHECK.len() + SHADE_ALL_GEOMS.len());
    body.push_str(script);
    body.push_str(API_ERROR_CHECK);
    if options.set_geom_draw_type_to_shade {
        body.push_str(SHADE_ALL_GEOMS);
    }

    format!(
        "// This *.vspscript file was automatically generated by {} {} \n\
         // using syntax tested on OpenVSP {}.\n\
         // To run this script, open OpenVSP and go to File -> Run Script...\n\
         \n\
         void main()\n\
         {{\n\
         {}\n\
         }}\n",
        options.generator_name,
        options.generator_version,
        options.openvsp_version,
        indent(&body, "    "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> VspScriptOptions {
        VspScriptOptions {
            generator_name: "airframe".to_string(),
            generator_version: "1.2.3".to_string(),
            ..VspScriptOptions::default()
        }
    }

    #[test]
    fn indent_skips_blank_lines() {
        assert_eq!(indent("a\n\n  \nb", "    "), "    a\n\n  \n    b");
    }

    #[test]
    fn banner_is_exact() {
        let out = wrap_script("A", &opts());
        assert!(out.starts_with(
            "// This *.vspscript file was automatically generated by airframe 1.2.3 \n\
             // using syntax tested on OpenVSP 3.36.0.\n\
             // To run this script, open OpenVSP and go to File -> Run Script...\n\nvoid main()\n{\n"
        ));
        assert!(out.ends_with("\n}\n"));
    }

    #[test]
    fn body_is_indented_and_error_check_follows_script() {
        let out = wrap_script("hello\nworld\n", &opts());
        assert!(out.contains("{\n    hello\n    world\n    \n    //==== Check For API Errors ====//\n"));
        assert!(out.contains("        ErrorObj err = PopLastError();\n"));
    }

    #[test]
    fn exact_output_without_shading() {
        let out = wrap_script("A\n", &opts().without_shading());
        let expected = concat!(
            "// This *.vspscript file was automatically generated by airframe 1.2.3 \n",
            "// using syntax tested on OpenVSP 3.36.0.\n",
            "// To run this script, open OpenVSP and go to File -> Run Script...\n",
            "\n",
            "void main()\n",
            "{\n",
            "    A\n",
            "    \n",
            "    //==== Check For API Errors ====//\n",
            "    while ( GetNumTotalErrors() > 0 )\n",
            "    {\n",
            "        ErrorObj err = PopLastError();\n",
            "        Print( err.GetErrorString() );\n",
            "    }\n",
            "\n",
            "}\n",
        );
        assert_eq!(out, expected);
    }
}
