/// Render the body of the generated script for one file.
///
/// With escaped content present, the output is a self-invoking block that
/// looks up the named module (declaring it with an empty dependency list if
/// missing, so many generated files can share one module without clobbering
/// each other), then registers the content in the module's cache under the
/// derived URL during the run phase.
///
/// With content absent (invalid JSON), the output is a single diagnostic
/// comment line and no executable code.
pub fn module_declaration(url: &str, escaped: Option<&str>, module_name: &str) -> String {
    match escaped {
        Some(content) => format!(
            "(function(module) {{\n\
             \x20 try {{\n\
             \x20   module = angular.module('{0}');\n\
             \x20 }} catch (e) {{\n\
             \x20   module = angular.module('{0}', []);\n\
             \x20 }}\n\
             \x20 module.run(['$cacheFactory', function($cacheFactory) {{\n\
             \x20   ($cacheFactory.get('{0}') || $cacheFactory('{0}')).put('{1}',\n\
             \x20     {2});\n\
             \x20 }}]);\n\
             }})();\n",
            module_name, url, content
        ),
        None => format!("/* Invalid JSON syntax in \"{}\", skipping content. */\n", url),
    }
}
