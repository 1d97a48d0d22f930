#[cfg(test)]
pub const MDX_POST: &str = "---
title: Example AI Post
date: 2025-11-28
description: Trying things out
tags:
  - ai
  - llm
author: Dichen6
---
# Example AI Post

Large language models are surprisingly good at geospatial questions.

<Callout>Remember to check the sources.</Callout>
";

#[cfg(test)]
pub const NO_FRONT_MATTER_POST: &str = "# Example post

Some text without any metadata at the top.
";

#[cfg(test)]
pub const CATEGORY_OVERRIDE_POST: &str = "---
title: Moved Around
date: \"2024-03-01\"
category: Idle-Thoughts
tags: [life]
---
Short body.
";
